//! Scene configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::atmosphere::{DayNightConfig, WeatherConfig};
use crate::core::types::Result;
use crate::grass::GrassConfig;
use crate::level::ContentPaths;
use crate::orbs::OrbConfig;
use crate::particles::AmbientParticleConfig;

/// Everything a scene needs besides the level file.
///
/// Every field has a default, so a JSON document only names what it
/// changes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Root seed; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Content directory layout
    pub content: ContentPaths,
    pub day_night: DayNightConfig,
    pub weather: WeatherConfig,
    pub ambient: AmbientParticleConfig,
    pub grass: GrassConfig,
    pub orbs: OrbConfig,
}

impl SceneConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SceneConfig::from_json_str(
            r#"{ "seed": 9, "weather": { "probability": 1.0 }, "grass": { "count": 10 } }"#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.weather.probability, 1.0);
        assert_eq!(config.weather.interval, 30.0);
        assert_eq!(config.grass.count, 10);
        assert_eq!(config.grass.radius, 300.0);
        assert_eq!(config.orbs.collision_radius, 9.0);
        assert_eq!(config.day_night.max_degrees, 120.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configs").join("scene.json");
        let config = SceneConfig {
            seed: Some(3),
            content: ContentPaths::with_root("/data/content"),
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = SceneConfig::load(&path).unwrap();
        assert_eq!(loaded.seed, Some(3));
        assert_eq!(loaded.content.root, std::path::PathBuf::from("/data/content"));
        assert_eq!(loaded.ambient.emitters, 3);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(SceneConfig::from_json_str("{ seed: "), Err(Error::Json(_))));
    }
}
