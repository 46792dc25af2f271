//! Day/night and weather tuning.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Day/night
// ---------------------------------------------------------------------------

/// Day/night cycle parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DayNightConfig {
    /// Bound on the light rotation angle, in degrees. Must exceed 90.
    pub max_degrees: f32,
    /// Radians of light rotation per second. Also scales weather ramps.
    pub cycle_speed: f32,
    /// Distance from the viewer at which the active light is placed
    pub light_distance: f32,
}

impl Default for DayNightConfig {
    fn default() -> Self {
        Self {
            max_degrees: 120.0,
            cycle_speed: 0.25,
            light_distance: 250.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// Rain and storm parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Seconds between rain re-rolls
    pub interval: f32,
    /// Chance that a re-roll turns rain on
    pub probability: f32,
    /// Seconds between changes of the per-tick rain emission count
    pub rain_delta: f32,
    /// Upper bound on the storm blend amount
    pub max_lerp: f32,
    /// Fog start floor as a fraction of the level's value
    pub fog_start_floor: f32,
    /// Fog range floor as a fraction of the level's value
    pub fog_range_floor: f32,
    /// Storm blend rate, scaled by the cycle speed
    pub sky_rate: f32,
    /// Fog shrink and recovery rate, scaled by the cycle speed
    pub fog_rate: f32,
    /// Rain pool size
    pub capacity: usize,
    /// Rain drop lifetime in seconds
    pub lifetime: f32,
    /// Fall direction (normalized on use)
    pub direction: [f32; 3],
    /// Fall speed in units per second
    pub speed: f32,
    /// Drop size before jitter
    pub size: [f32; 2],
    /// Random extra drop length, up to this much
    pub size_jitter: f32,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            interval: 30.0,
            probability: 0.25,
            rain_delta: 5.0,
            max_lerp: 0.5,
            fog_start_floor: 0.15,
            fog_range_floor: 0.4,
            sky_rate: 0.25,
            fog_rate: 200.0,
            capacity: 400,
            lifetime: 1.25,
            direction: [0.025, -1.0, 0.035],
            speed: 300.0,
            size: [0.5, 5.0],
            size_jitter: 1.0,
        }
    }
}
