//! Faces: validated triangle index runs plus derived edges.

use serde::{Deserialize, Serialize};

use crate::error::MeshError;

/// An undirected edge between two raw vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub a: u32,
    pub b: u32,
}

impl Edge {
    pub fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }

    /// Canonical (low, high) ordering for undirected comparison.
    fn ordered(&self) -> (u32, u32) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

/// A polygonal face stored as its triangulation.
///
/// `indices` is an ordered list of triangle-forming raw vertex indices; the
/// count is always a multiple of three. Edges are derived from the indices
/// on demand, never stored, so they cannot drift after an index mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    indices: Vec<u32>,
    /// Host material slot this face renders with.
    pub material: u32,
    /// Smoothing group id; 0 means hard edges.
    pub smoothing_group: u32,
    /// Whether the face's UVs are authored rather than auto-projected.
    pub manual_uv: bool,
}

impl Face {
    /// Create a face from triangle indices.
    pub fn new(indices: Vec<u32>) -> Result<Self, MeshError> {
        if indices.is_empty() {
            return Err(MeshError::EmptyIndexList);
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::NonTriangulated(indices.len()));
        }
        Ok(Self {
            indices,
            material: 0,
            smoothing_group: 0,
            manual_uv: false,
        })
    }

    /// New face with this face's material/smoothing metadata but different
    /// indices.
    pub fn like(&self, indices: Vec<u32>) -> Result<Self, MeshError> {
        let mut face = Face::new(indices)?;
        face.material = self.material;
        face.smoothing_group = self.smoothing_group;
        face.manual_uv = self.manual_uv;
        Ok(face)
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Replace the index list, revalidating the multiple-of-three invariant.
    pub fn set_indices(&mut self, indices: Vec<u32>) -> Result<(), MeshError> {
        if indices.is_empty() {
            return Err(MeshError::EmptyIndexList);
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::NonTriangulated(indices.len()));
        }
        self.indices = indices;
        Ok(())
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Raw indices used by this face, deduplicated, in first-seen order.
    pub fn distinct_indices(&self) -> Vec<u32> {
        let mut seen = Vec::new();
        for &ix in &self.indices {
            if !seen.contains(&ix) {
                seen.push(ix);
            }
        }
        seen
    }

    /// Perimeter edges of the face.
    ///
    /// Each triangle contributes its three edges; undirected edges used by
    /// two triangles are interior diagonals of the polygon and are dropped.
    pub fn edges(&self) -> Vec<Edge> {
        let mut counts: Vec<(Edge, u32)> = Vec::new();

        for tri in self.indices.chunks_exact(3) {
            for e in [
                Edge::new(tri[0], tri[1]),
                Edge::new(tri[1], tri[2]),
                Edge::new(tri[2], tri[0]),
            ] {
                match counts.iter_mut().find(|(c, _)| c.ordered() == e.ordered()) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((e, 1)),
                }
            }
        }

        counts
            .into_iter()
            .filter_map(|(e, n)| (n == 1).then_some(e))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_non_triangulated() {
        assert!(matches!(
            Face::new(vec![0, 1, 2, 3]),
            Err(MeshError::NonTriangulated(4))
        ));
        assert!(matches!(Face::new(vec![]), Err(MeshError::EmptyIndexList)));
    }

    #[test]
    fn test_triangle_edges() {
        let face = Face::new(vec![0, 1, 2]).unwrap();
        let edges = face.edges();
        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn test_quad_perimeter_drops_diagonal() {
        // Two triangles sharing the 1-2 diagonal.
        let face = Face::new(vec![0, 1, 2, 1, 3, 2]).unwrap();
        let edges = face.edges();

        assert_eq!(edges.len(), 4);
        assert!(!edges
            .iter()
            .any(|e| e.ordered() == Edge::new(1, 2).ordered()));
    }

    #[test]
    fn test_like_inherits_metadata() {
        let mut face = Face::new(vec![0, 1, 2]).unwrap();
        face.material = 3;
        face.smoothing_group = 7;
        face.manual_uv = true;

        let child = face.like(vec![3, 4, 5]).unwrap();
        assert_eq!(child.material, 3);
        assert_eq!(child.smoothing_group, 7);
        assert!(child.manual_uv);
        assert_eq!(child.indices(), &[3, 4, 5]);
    }

    #[test]
    fn test_edges_follow_index_mutation() {
        let mut face = Face::new(vec![0, 1, 2]).unwrap();
        face.set_indices(vec![5, 6, 7]).unwrap();
        let edges = face.edges();
        assert!(edges.contains(&Edge::new(5, 6)));
        assert!(edges.contains(&Edge::new(6, 7)));
        assert!(edges.contains(&Edge::new(7, 5)));
    }
}
