//! Grass field settings

use serde::{Deserialize, Serialize};

/// Grass recycling settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GrassConfig {
    /// Number of recycled blades.
    pub count: usize,
    /// Blades farther than this from the camera are respawned.
    pub radius: f32,
    /// Size change per unit of camera approach.
    pub growth_rate: f32,
    /// Smallest blade, as a fraction of the grass billboard size.
    pub min_template_scale: f32,
}

impl Default for GrassConfig {
    fn default() -> Self {
        Self {
            count: 200,
            radius: 300.0,
            growth_rate: 0.05,
            min_template_scale: 0.5,
        }
    }
}
