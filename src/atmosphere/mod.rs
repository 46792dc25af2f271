//! Environment simulation: day/night lighting, fog and rain.
//!
//! [`EnvironmentSimulator`] owns the light sweep and sky colour,
//! [`WeatherSimulator`] rolls for rain and drives the storm blend. The scene
//! ticks the environment first, then the weather, then feeds the weather's
//! blend back into the environment with
//! [`EnvironmentSimulator::apply_weather`].

pub mod config;
pub mod day_night;
pub mod fog;
pub mod weather;

// Re-exports
pub use config::{DayNightConfig, WeatherConfig};
pub use day_night::{DayPhase, EnvironmentSimulator};
pub use fog::FogState;
pub use weather::WeatherSimulator;
