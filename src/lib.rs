//! Unbound - scene simulation and procedural geometry for an outdoor
//! exploration game

pub mod core;
pub mod math;
pub mod geometry;
pub mod terrain;
pub mod mesh;
pub mod level;
pub mod atmosphere;
pub mod particles;
pub mod grass;
pub mod orbs;
pub mod scene;
