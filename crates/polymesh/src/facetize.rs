//! Decompose faces into their base triangles.

use std::collections::HashSet;

use tracing::debug;

use crate::error::MeshError;
use crate::mesh::PolyMesh;
use crate::rebuild::FaceRebuildData;

impl PolyMesh {
    /// Break faces down into independent triangular faces.
    ///
    /// Each run of three indices in a selected face becomes its own face,
    /// inheriting the source's material and smoothing metadata, with the
    /// three vertices copied by value and registered under the source
    /// vertices' shared groups. New faces are committed before the source
    /// faces are deleted so shared-index bookkeeping for the rest of the
    /// mesh stays valid throughout.
    ///
    /// Returns the indices of the new triangle faces. Derived normals are
    /// not regenerated here; call [`PolyMesh::recalculate_normals`] after.
    pub fn facetize(&mut self, selection: &[usize]) -> Result<Vec<usize>, MeshError> {
        if selection.is_empty() {
            return Err(MeshError::EmptyFaceList);
        }
        let mut seen = HashSet::new();
        for &f in selection {
            if f >= self.faces.len() {
                return Err(MeshError::FaceOutOfRange {
                    index: f,
                    count: self.faces.len(),
                });
            }
            if !seen.insert(f) {
                return Err(MeshError::DuplicateFace(f));
            }
        }

        let mut records = Vec::new();
        for &fi in selection {
            let face = &self.faces[fi];
            for tri in face.indices().chunks_exact(3) {
                let vertices = tri
                    .iter()
                    .map(|&ix| self.vertices[ix as usize].clone())
                    .collect();
                let shared_groups = tri
                    .iter()
                    .map(|&ix| {
                        self.shared.group_of(ix).ok_or_else(|| {
                            MeshError::InvalidSharedTable(format!(
                                "raw index {ix} has no shared group"
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                records.push(FaceRebuildData {
                    face: face.like(vec![0, 1, 2])?,
                    vertices,
                    shared_groups,
                });
            }
        }

        let triangle_count = records.len();

        // Commit the new faces first, then delete the sources; the reverse
        // order would strip vertices the rebuild records still reference.
        FaceRebuildData::apply(records, self)?;
        self.delete_faces(selection)?;

        // The new faces were appended after every selected face, so after
        // deletion they occupy the tail of the face array.
        let face_count = self.face_count();
        let new_faces = (face_count - triangle_count..face_count).collect();

        debug!(
            "facetize: triangulated {} faces into {} triangles",
            selection.len(),
            triangle_count
        );
        Ok(new_faces)
    }
}
