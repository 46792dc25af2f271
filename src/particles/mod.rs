//! Fixed-capacity particle pools and the rain/ambient behaviours that drive
//! them.

pub mod pool;
pub mod updater;
pub mod effects;

pub use effects::{AmbientEffects, AmbientParticleConfig};
pub use pool::{Particle, ParticlePool};
pub use updater::{AmbientUpdater, ParticleUpdater, RainUpdater};
