//! Error types for kernel operations.

/// Errors reported by mesh editing operations.
///
/// Argument-validation failures fail fast with a descriptive variant rather
/// than silently no-opping; the `Display` string is the human-readable
/// message handed back to the host.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("face index count {0} is not a multiple of three")]
    NonTriangulated(usize),
    #[error("face has no indices")]
    EmptyIndexList,
    #[error("no faces were supplied to the operation")]
    EmptyFaceList,
    #[error("duplicate face index {0} in selection")]
    DuplicateFace(usize),
    #[error("face index {index} out of range for {count} faces")]
    FaceOutOfRange { index: usize, count: usize },
    #[error("vertex index {index} out of range for {count} vertices")]
    VertexOutOfRange { index: u32, count: usize },
    #[error("invalid shared-vertex table: {0}")]
    InvalidSharedTable(String),
    #[error("invalid shape parameter: {0}")]
    InvalidParameter(String),
}
