//! Transient face-rebuild records used to splice new faces into a mesh.

use crate::error::MeshError;
use crate::mesh::PolyMesh;
use crate::face::Face;
use crate::vertex::Vertex;

/// A new face definition paired with the vertices and shared-group
/// assignments needed to splice it into a mesh.
///
/// The face's indices are local to `vertices` (for a triangle: `0, 1, 2`);
/// `apply` offsets them into the mesh's vertex array. `shared_groups` is
/// parallel to `vertices` and names the existing group each new vertex
/// joins. Records live for a single edit operation.
#[derive(Debug, Clone)]
pub struct FaceRebuildData {
    pub face: Face,
    pub vertices: Vec<Vertex>,
    pub shared_groups: Vec<u32>,
}

impl FaceRebuildData {
    /// Append a batch of rebuilt faces to the mesh.
    ///
    /// For each record the vertices are appended, the face indices offset
    /// by the insertion base, and each new raw index registered under its
    /// shared group. Returns the indices of the appended faces.
    pub fn apply(
        records: Vec<FaceRebuildData>,
        mesh: &mut PolyMesh,
    ) -> Result<Vec<usize>, MeshError> {
        let mut new_faces = Vec::with_capacity(records.len());

        for record in records {
            if record.shared_groups.len() != record.vertices.len() {
                return Err(MeshError::InvalidSharedTable(format!(
                    "rebuild record has {} vertices but {} shared-group assignments",
                    record.vertices.len(),
                    record.shared_groups.len()
                )));
            }
            for &ix in record.face.indices() {
                if ix as usize >= record.vertices.len() {
                    return Err(MeshError::VertexOutOfRange {
                        index: ix,
                        count: record.vertices.len(),
                    });
                }
            }

            let base = mesh.vertices.len() as u32;

            for (local, &group) in record.shared_groups.iter().enumerate() {
                mesh.shared.add_to_group(group, base + local as u32)?;
            }
            mesh.vertices.extend(record.vertices);

            let indices = record.face.indices().iter().map(|ix| base + ix).collect();
            let face = record.face.like(indices)?;
            new_faces.push(mesh.faces.len());
            mesh.faces.push(face);
        }

        Ok(new_faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use crate::mesh::tests::two_triangles;

    #[test]
    fn test_apply_appends_and_registers_shared() {
        let mut mesh = two_triangles();
        let vc = mesh.vertex_count();
        let fc = mesh.face_count();

        let group = mesh.shared().group_of(0).unwrap();
        let record = FaceRebuildData {
            face: Face::new(vec![0, 1, 2]).unwrap(),
            vertices: vec![
                Vertex::at(Vec3::ZERO),
                Vertex::at(Vec3::X),
                Vertex::at(Vec3::Y),
            ],
            shared_groups: vec![group, group, group],
        };

        let added = FaceRebuildData::apply(vec![record], &mut mesh).unwrap();

        assert_eq!(added, vec![fc]);
        assert_eq!(mesh.vertex_count(), vc + 3);
        assert_eq!(mesh.face_count(), fc + 1);
        // The appended face was offset past the existing vertices.
        for &ix in mesh.faces()[fc].indices() {
            assert!(ix as usize >= vc);
        }
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_apply_rejects_mismatched_groups() {
        let mut mesh = two_triangles();
        let record = FaceRebuildData {
            face: Face::new(vec![0, 1, 2]).unwrap(),
            vertices: vec![Vertex::at(Vec3::ZERO)],
            shared_groups: vec![],
        };
        assert!(FaceRebuildData::apply(vec![record], &mut mesh).is_err());
    }
}
