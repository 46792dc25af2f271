//! Core types and utilities shared by every subsystem

pub mod types;
pub mod error;
pub mod lines;
pub mod logging;
pub mod random;
pub mod camera;

pub use types::*;
pub use error::Error;
pub use camera::Camera;
pub use random::SimRng;
