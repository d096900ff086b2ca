//! Polygonal mesh editing kernel.
//!
//! The portable core of an in-editor mesh modeling tool:
//! - [`vertex::Vertex`] - per-vertex attribute record with averaging/mixing
//! - [`shared::SharedVertexTable`] - coincident-vertex grouping
//! - [`face::Face`] - triangle index runs with derived edges
//! - [`rebuild::FaceRebuildData`] - splice records for edit operations
//! - [`mesh::PolyMesh`] - the mesh container, face deletion, facetization
//! - [`shapes`] - procedural shape generation
//! - [`settings`] - typed modeling settings
//!
//! The host editor owns rendering, undo, and UI; this crate only transforms
//! attribute arrays and topology and hands the results back.

pub mod error;
pub mod face;
pub mod facetize;
pub mod math;
pub mod mesh;
pub mod rebuild;
pub mod settings;
pub mod shapes;
pub mod shared;
pub mod vertex;

pub use error::MeshError;
pub use face::{Edge, Face};
pub use mesh::PolyMesh;
pub use rebuild::FaceRebuildData;
pub use settings::ModelingSettings;
pub use shared::SharedVertexTable;
pub use vertex::{Vertex, VertexArrays};
