//! The kernel-side mesh: vertices, faces, and shared-vertex bookkeeping.

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use tracing::debug;

use crate::error::MeshError;
use crate::face::{Edge, Face};
use crate::shared::SharedVertexTable;
use crate::vertex::{Vertex, VertexArrays};

/// A polygonal mesh with per-vertex attributes and shared-vertex grouping.
///
/// Mirrors the host's mesh representation closely enough that attribute
/// arrays can be handed back for GPU upload after any edit.
#[derive(Debug, Clone, Default)]
pub struct PolyMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) faces: Vec<Face>,
    pub(crate) shared: SharedVertexTable,
}

impl PolyMesh {
    /// Assemble a mesh, validating that every face index is in range and
    /// the shared table covers every vertex.
    pub fn new(
        vertices: Vec<Vertex>,
        faces: Vec<Face>,
        shared: SharedVertexTable,
    ) -> Result<Self, MeshError> {
        for face in &faces {
            for &ix in face.indices() {
                if ix as usize >= vertices.len() {
                    return Err(MeshError::VertexOutOfRange {
                        index: ix,
                        count: vertices.len(),
                    });
                }
            }
        }
        shared.validate(vertices.len())?;
        Ok(Self {
            vertices,
            faces,
            shared,
        })
    }

    /// Build a mesh from groups of four points, two triangles per group.
    ///
    /// Each quad owns its four vertices; coincident points across quads are
    /// welded into shared groups at `tolerance`. The triangle winding is
    /// `(0,1,2)`, `(1,3,2)` within each group.
    pub fn from_point_quads(points: &[Vec3], tolerance: f32) -> Result<Self, MeshError> {
        if points.is_empty() || points.len() % 4 != 0 {
            return Err(MeshError::InvalidParameter(format!(
                "point count {} is not a positive multiple of four",
                points.len()
            )));
        }

        let vertices: Vec<Vertex> = points.iter().map(|&p| Vertex::at(p)).collect();

        let mut faces = Vec::with_capacity(points.len() / 4);
        for quad in 0..points.len() / 4 {
            let b = (quad * 4) as u32;
            faces.push(Face::new(vec![b, b + 1, b + 2, b + 1, b + 3, b + 2])?);
        }

        let shared = SharedVertexTable::from_positions(points, tolerance);

        Ok(Self {
            vertices,
            faces,
            shared,
        })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn face(&self, index: usize) -> Option<&Face> {
        self.faces.get(index)
    }

    pub fn shared(&self) -> &SharedVertexTable {
        &self.shared
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Total triangle count across all faces.
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.triangle_count()).sum()
    }

    /// Vertex positions as a flat array (the host upload shape).
    pub fn positions(&self) -> Vec<Vec3> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Every face's derived edges, concatenated.
    pub fn edges(&self) -> Vec<Edge> {
        self.faces.iter().flat_map(|f| f.edges()).collect()
    }

    /// Attribute arrays for handing the mesh back to the host.
    pub fn to_arrays(&self) -> VertexArrays {
        VertexArrays::from_vertices(&self.vertices)
    }

    /// Delete faces and compact away vertices no longer referenced by any
    /// surviving face, remapping surviving face indices and rebuilding the
    /// shared table.
    pub fn delete_faces(&mut self, selection: &[usize]) -> Result<(), MeshError> {
        if selection.is_empty() {
            return Err(MeshError::EmptyFaceList);
        }
        for &f in selection {
            if f >= self.faces.len() {
                return Err(MeshError::FaceOutOfRange {
                    index: f,
                    count: self.faces.len(),
                });
            }
        }

        let doomed: HashSet<usize> = selection.iter().copied().collect();

        // Vertices referenced by a surviving face stay.
        let mut used = vec![false; self.vertices.len()];
        for (i, face) in self.faces.iter().enumerate() {
            if doomed.contains(&i) {
                continue;
            }
            for &ix in face.indices() {
                used[ix as usize] = true;
            }
        }

        let mut remap: HashMap<u32, u32> = HashMap::new();
        let mut next = 0u32;
        for (old, &keep) in used.iter().enumerate() {
            if keep {
                remap.insert(old as u32, next);
                next += 1;
            }
        }

        let old_vertices = std::mem::take(&mut self.vertices);
        self.vertices = old_vertices
            .into_iter()
            .enumerate()
            .filter_map(|(i, v)| used[i].then_some(v))
            .collect();

        let old_faces = std::mem::take(&mut self.faces);
        let mut faces = Vec::with_capacity(old_faces.len() - doomed.len());
        for (i, face) in old_faces.into_iter().enumerate() {
            if doomed.contains(&i) {
                continue;
            }
            let indices = face.indices().iter().map(|ix| remap[ix]).collect();
            faces.push(face.like(indices)?);
        }
        self.faces = faces;

        self.shared.remap(&remap);

        debug!(
            "delete_faces: removed {} faces, {} vertices remain",
            doomed.len(),
            self.vertices.len()
        );
        Ok(())
    }

    /// Recompute vertex normals from face planes.
    ///
    /// Each triangle's area-weighted plane normal accumulates onto its
    /// three raw vertices; the result is normalized per vertex. This is the
    /// baseline derived geometry the host expects regenerated after edits.
    pub fn recalculate_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.vertices.len()];

        for face in &self.faces {
            for tri in face.indices().chunks_exact(3) {
                let p0 = self.vertices[tri[0] as usize].position;
                let p1 = self.vertices[tri[1] as usize].position;
                let p2 = self.vertices[tri[2] as usize].position;
                let n = (p1 - p0).cross(p2 - p0);
                acc[tri[0] as usize] += n;
                acc[tri[1] as usize] += n;
                acc[tri[2] as usize] += n;
            }
        }

        for (v, n) in self.vertices.iter_mut().zip(acc) {
            v.normal = Some(n.normalize_or_zero());
        }
    }

    /// Axis-aligned bounds of all vertex positions, `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.vertices.first()?.position;
        let mut min = first;
        let mut max = first;
        for v in &self.vertices {
            min = min.min(v.position);
            max = max.max(v.position);
        }
        Some((min, max))
    }

    /// Translate the mesh so its bounds center sits at the origin.
    ///
    /// Returns the offset that was applied (zero for an empty mesh); the
    /// host moves its transform by the inverse to keep the object in place.
    pub fn center_pivot(&mut self) -> Vec3 {
        let Some((min, max)) = self.bounds() else {
            return Vec3::ZERO;
        };
        let offset = -(min + max) * 0.5;
        for v in &mut self.vertices {
            v.position += offset;
        }
        offset
    }

    /// Check the mesh invariants: face indices in range and the shared
    /// table a total partition over the vertices.
    pub fn validate(&self) -> Result<(), MeshError> {
        for face in &self.faces {
            for &ix in face.indices() {
                if ix as usize >= self.vertices.len() {
                    return Err(MeshError::VertexOutOfRange {
                        index: ix,
                        count: self.vertices.len(),
                    });
                }
            }
        }
        self.shared.validate(self.vertices.len())
    }
}
