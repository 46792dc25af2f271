//! Procedural geometry: icospheres and rectangular grids.
//!
//! Everything here produces plain vertex/index arrays with `bytemuck`-castable
//! vertex layouts. Uploading them is the renderer's job.

pub mod vertex;
pub mod icosphere;
pub mod grid;
pub mod cache;

pub use vertex::{VertexPosNorm, VertexPosNormTex, VertexPosTangNormTex};
pub use icosphere::{IcosphereMesh, SUBDIVISION_PASSES};
pub use grid::{GridMesh, GridSpec};
pub use cache::{GeometryCache, SphereClass};
