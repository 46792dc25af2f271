//! Terrain height fields built from heightmaps or flat planes

pub mod height_field;

pub use height_field::{TerrainHeightField, BELOW_WORLD_HEIGHT};
