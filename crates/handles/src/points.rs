//! Vertex and point highlight builders.

use glam::{Vec2, Vec3};
use polymesh::PolyMesh;
use tracing::trace;

use crate::{
    HandleError, HandleMesh, HandleScratch, HandleTopology, IndexFormat, MAX_BILLBOARD_POINTS,
};

/// Build highlight geometry for a set of raw vertex indices.
///
/// With geometry-shader support the target shares the mesh's position
/// array and carries a `Points` index buffer; without it each point is
/// pre-expanded into a billboard quad.
pub fn vertex_handles(
    mesh: &PolyMesh,
    indexes: &[u32],
    geometry_shaders: bool,
    target: &mut HandleMesh,
) -> Result<(), HandleError> {
    let count = mesh.vertex_count();
    for &ix in indexes {
        if ix as usize >= count {
            return Err(HandleError::IndexOutOfBounds { index: ix, count });
        }
    }

    if geometry_shaders {
        vertex_points(mesh, indexes, target);
    } else {
        vertex_billboards(mesh, indexes, target);
    }
    Ok(())
}

/// Build highlight geometry for one representative vertex per shared group.
///
/// The representative is the group's first raw index. `scratch` is reused
/// across calls and cleared here before use.
pub fn shared_vertex_handles(
    mesh: &PolyMesh,
    scratch: &mut HandleScratch,
    geometry_shaders: bool,
    target: &mut HandleMesh,
) -> Result<(), HandleError> {
    scratch.vertex_list.clear();
    for group in mesh.shared().groups() {
        if let Some(&first) = group.first() {
            scratch.vertex_list.push(first);
        }
    }

    if geometry_shaders {
        vertex_points(mesh, &scratch.vertex_list, target);
        Ok(())
    } else {
        vertex_billboards(mesh, &scratch.vertex_list, target);
        Ok(())
    }
}

/// Geometry-expansion path: shared position array plus a point index buffer.
fn vertex_points(mesh: &PolyMesh, indexes: &[u32], target: &mut HandleMesh) {
    target.clear();
    target.positions = mesh.positions();
    target.indices.extend_from_slice(indexes);
    target.topology = HandleTopology::Points;
}

/// Fallback path: one pre-expanded billboard quad per selected vertex.
fn vertex_billboards(mesh: &PolyMesh, indexes: &[u32], target: &mut HandleMesh) {
    let positions = mesh.positions();
    expand_billboards(
        indexes.iter().map(|&ix| positions[ix as usize]),
        indexes.len(),
        target,
    );
}

/// Build billboard quads directly from a list of points.
pub fn point_billboards(points: &[Vec3], target: &mut HandleMesh) {
    expand_billboards(points.iter().copied(), points.len(), target);
}

/// Expand points into 4-corner billboard quads.
///
/// The position is replicated four times per point; `uv0` carries the
/// quad corner and `offsets` the corner direction the shader displaces
/// along. Points beyond the 16-bit index range are silently dropped.
fn expand_billboards(
    points: impl Iterator<Item = Vec3>,
    point_count: usize,
    target: &mut HandleMesh,
) {
    let billboard_count = point_count.min(MAX_BILLBOARD_POINTS);
    if billboard_count < point_count {
        trace!(
            "expand_billboards: dropping {} points beyond the index range",
            point_count - billboard_count
        );
    }

    target.clear();
    target.positions.reserve(billboard_count * 4);
    target.uv0.reserve(billboard_count * 4);
    target.offsets.reserve(billboard_count * 4);
    target.indices.reserve(billboard_count * 6);

    for (i, p) in points.enumerate() {
        if i >= billboard_count {
            break;
        }
        let t = (i * 4) as u32;

        target.positions.extend([p, p, p, p]);
        target.uv0.extend([
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        ]);
        target.offsets.extend([
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(-1.0, 1.0),
            Vec2::new(1.0, 1.0),
        ]);
        target
            .indices
            .extend([t, t + 1, t + 2, t + 1, t + 3, t + 2]);
    }

    target.topology = HandleTopology::Triangles;
    target.index_format = IndexFormat::U16;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{assert_indices_in_bounds, two_triangles};

    #[test]
    fn test_vertex_points_path() {
        let mesh = two_triangles();
        let mut target = HandleMesh::new();
        vertex_handles(&mesh, &[0, 2, 4], true, &mut target).unwrap();

        assert_eq!(target.topology, HandleTopology::Points);
        assert_eq!(target.indices, vec![0, 2, 4]);
        assert_eq!(target.positions.len(), mesh.vertex_count());
        assert_indices_in_bounds(&target);
    }

    #[test]
    fn test_vertex_billboard_path() {
        let mesh = two_triangles();
        let mut target = HandleMesh::new();
        vertex_handles(&mesh, &[0, 5], false, &mut target).unwrap();

        assert_eq!(target.topology, HandleTopology::Triangles);
        assert_eq!(target.positions.len(), 8);
        assert_eq!(target.uv0.len(), 8);
        assert_eq!(target.offsets.len(), 8);
        assert_eq!(target.indices.len(), 12);
        assert_indices_in_bounds(&target);
    }

    #[test]
    fn test_vertex_handles_rejects_out_of_range() {
        let mesh = two_triangles();
        let mut target = HandleMesh::new();
        let result = vertex_handles(&mesh, &[99], true, &mut target);
        assert!(matches!(
            result,
            Err(HandleError::IndexOutOfBounds { index: 99, .. })
        ));
    }

    #[test]
    fn test_shared_vertex_handles_picks_one_per_group() {
        let mesh = two_triangles();
        let mut scratch = HandleScratch::new();
        // Dirty the scratch buffer; the builder must clear it, not trust it.
        scratch.vertex_list.extend([7, 7, 7]);

        let mut target = HandleMesh::new();
        shared_vertex_handles(&mesh, &mut scratch, true, &mut target).unwrap();

        // 6 raw vertices, one welded pair -> 5 groups.
        assert_eq!(target.indices.len(), 5);
        assert_indices_in_bounds(&target);
    }

    #[test]
    fn test_point_billboards_clamps_silently() {
        let points: Vec<Vec3> = (0..MAX_BILLBOARD_POINTS + 10)
            .map(|i| Vec3::new(i as f32, 0.0, 0.0))
            .collect();
        let mut target = HandleMesh::new();
        point_billboards(&points, &mut target);

        // Points beyond the addressable range are dropped, not an error.
        assert_eq!(target.positions.len(), MAX_BILLBOARD_POINTS * 4);
        assert_eq!(target.indices.len(), MAX_BILLBOARD_POINTS * 6);
        assert_indices_in_bounds(&target);
    }

    #[test]
    fn test_target_reuse_is_clean() {
        let mesh = two_triangles();
        let mut target = HandleMesh::new();
        vertex_handles(&mesh, &[0, 1, 2], false, &mut target).unwrap();
        let billboard_len = target.positions.len();

        // Rebuild with a smaller selection into the same target.
        vertex_handles(&mesh, &[0], false, &mut target).unwrap();
        assert!(target.positions.len() < billboard_len);
        assert_eq!(target.positions.len(), 4);
    }
}
