//! Edge highlight builders.

use glam::Vec4;
use polymesh::{Edge, PolyMesh};
use tracing::trace;

use crate::{
    HandleError, HandleMesh, HandleTopology, IndexFormat, MAX_BILLBOARD_POINTS, MAX_LINE_ELEMENTS,
};

/// Build highlight geometry for every edge of the mesh.
pub fn edge_lines(
    mesh: &PolyMesh,
    geometry_shaders: bool,
    target: &mut HandleMesh,
) -> Result<(), HandleError> {
    edge_lines_for(mesh, &mesh.edges(), geometry_shaders, target)
}

/// Build highlight geometry for a subset of edges.
///
/// With geometry-shader support this is a `Lines` index buffer over the
/// shared position array, clamped to the 16-bit-addressable element count;
/// edges beyond the clamp are silently dropped. The fallback pre-expands
/// each edge into a billboard quad.
pub fn edge_lines_for(
    mesh: &PolyMesh,
    edges: &[Edge],
    geometry_shaders: bool,
    target: &mut HandleMesh,
) -> Result<(), HandleError> {
    validate_edges(mesh, edges)?;

    if !geometry_shaders {
        return edge_billboards(mesh, edges, target);
    }

    let edge_count = edges.len().min(MAX_LINE_ELEMENTS);
    if edge_count < edges.len() {
        trace!(
            "edge_lines_for: dropping {} edges beyond the index range",
            edges.len() - edge_count
        );
    }

    target.clear();
    target.positions = mesh.positions();
    target.indices.reserve(edge_count * 2);
    for edge in &edges[..edge_count] {
        target.indices.extend([edge.a, edge.b]);
    }
    target.topology = HandleTopology::Lines;
    target.index_format = IndexFormat::U16;
    Ok(())
}

/// Fallback edge highlighting: one screen-space-expandable quad per edge.
///
/// Each edge contributes four vertices; `next_vertex` packs the position
/// the shader extrudes toward in xyz and the side sign in w. No clamping
/// here; the index format widens to 32 bits past the 16-bit range instead.
pub fn edge_billboards(
    mesh: &PolyMesh,
    edges: &[Edge],
    target: &mut HandleMesh,
) -> Result<(), HandleError> {
    validate_edges(mesh, edges)?;

    let positions = mesh.positions();

    target.clear();
    target.positions.reserve(edges.len() * 4);
    target.next_vertex.reserve(edges.len() * 4);
    target.indices.reserve(edges.len() * 4);

    target.index_format = if edges.len() > MAX_BILLBOARD_POINTS {
        IndexFormat::U32
    } else {
        IndexFormat::U16
    };

    for (i, edge) in edges.iter().enumerate() {
        let a = positions[edge.a as usize];
        let b = positions[edge.b as usize];
        // Continuation point past b, used to miter the quad's far end.
        let c = b + (b - a);

        let n = (i * 4) as u32;

        target.positions.extend([a, a, b, b]);
        target.next_vertex.extend([
            Vec4::new(b.x, b.y, b.z, 1.0),
            Vec4::new(b.x, b.y, b.z, -1.0),
            Vec4::new(c.x, c.y, c.z, 1.0),
            Vec4::new(c.x, c.y, c.z, -1.0),
        ]);
        target.indices.extend([n, n + 1, n + 3, n + 2]);
    }

    target.topology = HandleTopology::Quads;
    Ok(())
}

fn validate_edges(mesh: &PolyMesh, edges: &[Edge]) -> Result<(), HandleError> {
    let count = mesh.vertex_count();
    for edge in edges {
        for ix in [edge.a, edge.b] {
            if ix as usize >= count {
                return Err(HandleError::IndexOutOfBounds { index: ix, count });
            }
        }
    }
    Ok(())
}
