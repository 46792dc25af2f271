//! File-backed meshes: format parsing, shared templates and placed instances

pub mod format;
pub mod instance;
pub mod cache;

pub use cache::MeshCache;
pub use instance::{sort_by_distance, Material, Mesh, MeshTemplate, SubsetTemplate};
