//! Procedural shape generation.

use glam::{Vec2, Vec3};

use crate::error::MeshError;
use crate::math::point_in_circumference;
use crate::mesh::PolyMesh;

/// Parameters for [`pipe`]. The radius always refers to the outer ring.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PipeParams {
    pub radius: f32,
    pub height: f32,
    /// Wall thickness; the inner ring sits at `radius - thickness`.
    pub thickness: f32,
    /// Number of sides around the circumference.
    pub segments: u32,
    /// Subdivisions along the height; 0 builds caps only.
    pub height_segments: u32,
    /// Weld tolerance for the shared-vertex table.
    pub weld_tolerance: f32,
}

impl Default for PipeParams {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 1.0,
            thickness: 0.25,
            segments: 6,
            height_segments: 1,
            weld_tolerance: crate::math::COMPARE_EPSILON,
        }
    }
}

impl PipeParams {
    fn validate(&self) -> Result<(), MeshError> {
        if !(self.radius > 0.0) || !(self.height > 0.0) {
            return Err(MeshError::InvalidParameter(
                "pipe radius and height must be positive".into(),
            ));
        }
        if self.thickness < 0.01 {
            return Err(MeshError::InvalidParameter(
                "pipe thickness must be at least 0.01".into(),
            ));
        }
        if self.thickness >= self.radius {
            return Err(MeshError::InvalidParameter(
                "pipe thickness must be smaller than the radius".into(),
            ));
        }
        if !(3..=64).contains(&self.segments) {
            return Err(MeshError::InvalidParameter(
                "pipe segments must be in 3..=64".into(),
            ));
        }
        if self.height_segments > 32 {
            return Err(MeshError::InvalidParameter(
                "pipe height segments must be at most 32".into(),
            ));
        }
        Ok(())
    }
}

/// Generate a hollow pipe standing on the XZ plane.
///
/// Walls are built as one quad per segment per height subdivision, inner and
/// outer, then the top and bottom rings are capped. Every quad owns its four
/// points; coincident points are welded into shared groups afterwards, so
/// seams stay editable as single points.
pub fn pipe(params: &PipeParams) -> Result<PolyMesh, MeshError> {
    params.validate()?;

    let segments = params.segments as usize;
    let step = 360.0 / segments as f32;

    let template_out: Vec<Vec2> = (0..segments)
        .map(|i| point_in_circumference(params.radius, i as f32 * step, Vec2::ZERO))
        .collect();
    let template_in: Vec<Vec2> = (0..segments)
        .map(|i| {
            point_in_circumference(params.radius - params.thickness, i as f32 * step, Vec2::ZERO)
        })
        .collect();

    let at = |t: Vec2, y: f32| Vec3::new(t.x, y, t.y);

    let mut points = Vec::new();

    // Walls, one band per height subdivision.
    for i in 0..params.height_segments {
        let y = i as f32 * (params.height / params.height_segments as f32);
        let y2 = (i + 1) as f32 * (params.height / params.height_segments as f32);

        for n in 0..segments {
            let out = template_out[n];
            let out2 = template_out[(n + 1) % segments];

            // Outer wall, wound to face outward.
            points.extend([at(out2, y), at(out, y), at(out2, y2), at(out, y2)]);

            let inn = template_in[n];
            let inn2 = template_in[(n + 1) % segments];

            // Inner wall, reversed winding to face inward.
            points.extend([at(inn, y), at(inn2, y), at(inn, y2), at(inn2, y2)]);
        }
    }

    // Top and bottom ring caps.
    for n in 0..segments {
        let out = template_out[n];
        let out2 = template_out[(n + 1) % segments];
        let inn = template_in[n];
        let inn2 = template_in[(n + 1) % segments];

        let h = params.height;
        points.extend([at(out, 0.0), at(out2, 0.0), at(inn, 0.0), at(inn2, 0.0)]);
        points.extend([at(out2, h), at(out, h), at(inn2, h), at(inn, h)]);
    }

    let mut mesh = PolyMesh::from_point_quads(&points, params.weld_tolerance)?;
    mesh.recalculate_normals();
    Ok(mesh)
}
