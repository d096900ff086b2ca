//! Face highlight builder.

use polymesh::PolyMesh;

use crate::{HandleError, HandleMesh, HandleTopology, IndexFormat};

/// Build a triangle buffer highlighting the selected faces.
///
/// The target shares the mesh's position array; the index buffer is the
/// concatenation of the selected faces' triangle indices.
pub fn face_highlight(
    mesh: &PolyMesh,
    selection: &[usize],
    target: &mut HandleMesh,
) -> Result<(), HandleError> {
    let count = mesh.face_count();
    for &f in selection {
        if f >= count {
            return Err(HandleError::FaceOutOfBounds { index: f, count });
        }
    }

    target.clear();
    target.positions = mesh.positions();
    for &f in selection {
        // Bounds checked above, so indexing cannot fail.
        target
            .indices
            .extend_from_slice(mesh.faces()[f].indices());
    }
    target.topology = HandleTopology::Triangles;
    target.index_format = IndexFormat::U16;
    Ok(())
}
