//! Selection-highlight geometry builders.
//!
//! Turns a mesh's vertex positions and a selection (vertex indices, edges,
//! or faces) into renderable buffers: point/line index buffers when the
//! renderer can expand them in a geometry shader, or pre-expanded billboard
//! quads as the fallback. The output is plain attribute arrays ready for
//! GPU upload; no rendering happens here.

mod edges;
mod faces;
mod points;

pub use edges::{edge_billboards, edge_lines, edge_lines_for};
pub use faces::face_highlight;
pub use points::{point_billboards, shared_vertex_handles, vertex_handles};

use glam::{Vec2, Vec3, Vec4};

/// Most billboard points addressable with 16-bit indices (4 vertices each).
pub const MAX_BILLBOARD_POINTS: usize = u16::MAX as usize / 4;

/// Most line elements addressable with 16-bit indices.
pub const MAX_LINE_ELEMENTS: usize = u16::MAX as usize / 2 - 1;

/// Primitive topology of a handle index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleTopology {
    Points,
    Lines,
    #[default]
    Triangles,
    Quads,
}

/// Index width the host should upload the buffer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexFormat {
    #[default]
    U16,
    U32,
}

/// Reusable render-geometry target the builders write into.
///
/// `offsets` carries billboard corner directions (the host's auxiliary UV
/// channel) and `next_vertex` carries the packed next-position-plus-side
/// data used by edge billboards. Unused channels are left empty.
#[derive(Debug, Clone, Default)]
pub struct HandleMesh {
    pub positions: Vec<Vec3>,
    pub uv0: Vec<Vec2>,
    pub offsets: Vec<Vec2>,
    pub next_vertex: Vec<Vec4>,
    pub indices: Vec<u32>,
    pub topology: HandleTopology,
    pub index_format: IndexFormat,
}

impl HandleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wipe all buffers. Builders call this first; targets are reused
    /// across frames and are never assumed clean.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.uv0.clear();
        self.offsets.clear();
        self.next_vertex.clear();
        self.indices.clear();
        self.index_format = IndexFormat::U16;
    }

    /// Position data as raw bytes for GPU upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Index data as raw bytes for GPU upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Per-call scratch storage reused across builder invocations.
#[derive(Debug, Default)]
pub struct HandleScratch {
    pub(crate) vertex_list: Vec<u32>,
}

impl HandleScratch {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Errors from handle builders. Selection inputs are validated so a built
/// index buffer can never reference a position outside the supplied array.
#[derive(Debug, thiserror::Error)]
pub enum HandleError {
    #[error("vertex index {index} out of range for {count} positions")]
    IndexOutOfBounds { index: u32, count: usize },
    #[error("face index {index} out of range for {count} faces")]
    FaceOutOfBounds { index: usize, count: usize },
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use glam::Vec3;
    use polymesh::{Face, PolyMesh, SharedVertexTable, Vertex};

    /// Two triangles sharing a welded corner (raw 1 and 3 coincide).
    pub fn two_triangles() -> PolyMesh {
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
        ];
        let vertices = positions.iter().map(|&p| Vertex::at(p)).collect();
        let faces = vec![
            Face::new(vec![0, 1, 2]).unwrap(),
            Face::new(vec![3, 4, 5]).unwrap(),
        ];
        let shared = SharedVertexTable::from_positions(&positions, 1e-4);
        PolyMesh::new(vertices, faces, shared).unwrap()
    }

    /// Assert every index points inside the position array.
    pub fn assert_indices_in_bounds(target: &crate::HandleMesh) {
        for &ix in &target.indices {
            assert!(
                (ix as usize) < target.positions.len(),
                "index {ix} out of bounds for {} positions",
                target.positions.len()
            );
        }
    }
}
