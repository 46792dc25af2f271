//! Per-particle behaviours

use crate::core::random::{centered, unit, SimRng};
use crate::core::types::Vec3;

use super::pool::Particle;

/// Horizontal reach of spawn placement around the eye
pub const SPAWN_SPREAD: f32 = 200.0;
/// Rain spawns this far above the eye
pub const RAIN_SPAWN_HEIGHT: f32 = 100.0;
/// Ambient drift amplitude in units per second
pub const AMBIENT_DRIFT: f32 = 12.0;

/// Behaviour plugged into a [`super::ParticlePool`]
pub trait ParticleUpdater {
    /// Place a freshly emitted particle. Called once, before its first
    /// [`advance`](Self::advance).
    fn spawn(&mut self, _particle: &mut Particle, _eye: Vec3, _look: Vec3) {}

    /// Move a live particle forward by `dt` seconds. Age is already updated.
    fn advance(&mut self, particle: &mut Particle, dt: f32);
}

/// Jittered point on a horizontal band ahead of the viewer
fn ahead_of(rng: &mut SimRng, eye: Vec3, look: Vec3) -> Vec3 {
    let jitter = Vec3::new(centered(rng), 0.0, centered(rng));
    eye + (jitter + look * 0.5) * SPAWN_SPREAD
}

/// Rain: spawns above and ahead of the viewer and falls in a straight line
pub struct RainUpdater {
    rng: SimRng,
}

impl RainUpdater {
    pub fn new(rng: SimRng) -> Self {
        Self { rng }
    }
}

impl ParticleUpdater for RainUpdater {
    fn spawn(&mut self, p: &mut Particle, eye: Vec3, look: Vec3) {
        let mut position = ahead_of(&mut self.rng, eye, look);
        position.y = eye.y + RAIN_SPAWN_HEIGHT;
        p.position = position;
    }

    fn advance(&mut self, p: &mut Particle, dt: f32) {
        p.position += p.direction * p.speed * dt;
    }
}

/// Ambient motes: spawn in a vertical slab around the viewer and wobble on a
/// per-particle frequency
pub struct AmbientUpdater {
    rng: SimRng,
}

impl AmbientUpdater {
    pub fn new(rng: SimRng) -> Self {
        Self { rng }
    }
}

impl ParticleUpdater for AmbientUpdater {
    fn spawn(&mut self, p: &mut Particle, eye: Vec3, look: Vec3) {
        let mut position = ahead_of(&mut self.rng, eye, look);
        position.y = eye.y + SPAWN_SPREAD * centered(&mut self.rng);
        p.position = position;
        p.speed *= unit(&mut self.rng);
    }

    fn advance(&mut self, p: &mut Particle, dt: f32) {
        let phase = p.age * p.speed;
        let step = AMBIENT_DRIFT * dt;
        p.position.x += phase.cos() * step;
        p.position.y += phase.sin() * step;
        p.position.z += phase.cos() * step;
    }
}
