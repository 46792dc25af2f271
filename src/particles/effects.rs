//! Ambient mote emitters

use serde::{Deserialize, Serialize};

use crate::core::random::{child, SimRng};
use crate::core::types::{Result, Vec2, Vec3};

use super::pool::ParticlePool;
use super::updater::AmbientUpdater;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientParticleConfig {
    /// Number of independent pools (one per mote colour)
    pub emitters: usize,
    pub capacity: usize,
    /// Particle lifetime in seconds
    pub lifetime: f32,
    /// Seconds between emissions
    pub emit_interval: f32,
    pub size: f32,
    /// Maximum oscillation rate
    pub speed: f32,
}

impl Default for AmbientParticleConfig {
    fn default() -> Self {
        Self {
            emitters: 3,
            capacity: 100,
            lifetime: 3.0,
            emit_interval: 0.1,
            size: 0.25,
            speed: 5.0,
        }
    }
}

/// Group of ambient pools fed together on a shared timer
#[derive(Debug)]
pub struct AmbientEffects {
    config: AmbientParticleConfig,
    pools: Vec<ParticlePool>,
    timer: f32,
}

impl AmbientEffects {
    pub fn new(config: AmbientParticleConfig, rng: &mut SimRng) -> Result<Self> {
        let pools = (0..config.emitters)
            .map(|_| {
                ParticlePool::new(
                    config.capacity,
                    config.lifetime,
                    Box::new(AmbientUpdater::new(child(rng))),
                )
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { config, pools, timer: 0.0 })
    }

    pub fn pools(&self) -> &[ParticlePool] {
        &self.pools
    }

    /// Live particles across every pool
    pub fn active(&self) -> usize {
        self.pools.iter().map(ParticlePool::active).sum()
    }

    /// Advance the emit timer, feed one particle to each pool when `emit` is
    /// set and the interval has passed, then update every pool.
    pub fn update(&mut self, dt: f32, emit: bool, eye: Vec3, look: Vec3) {
        self.timer += dt;
        if emit && self.timer > self.config.emit_interval {
            let size = Vec2::splat(self.config.size);
            for pool in &mut self.pools {
                pool.emit(Vec3::NEG_Y, size, self.config.speed);
            }
            self.timer = 0.0;
        }
        for pool in &mut self.pools {
            pool.update(dt, eye, look);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::rng;

    #[test]
    fn test_emits_only_when_enabled() {
        let mut root = rng(Some(1));
        let mut fx = AmbientEffects::new(AmbientParticleConfig::default(), &mut root).unwrap();
        assert_eq!(fx.pools().len(), 3);

        for _ in 0..10 {
            fx.update(0.05, false, Vec3::ZERO, Vec3::NEG_Z);
        }
        assert_eq!(fx.active(), 0);

        // first tick past the interval emits one per pool
        fx.update(0.05, true, Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(fx.active(), 3);
        fx.update(0.05, true, Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(fx.active(), 3);
    }

    #[test]
    fn test_particles_expire_after_lifetime() {
        let mut root = rng(Some(1));
        let config = AmbientParticleConfig { emitters: 1, ..Default::default() };
        let mut fx = AmbientEffects::new(config, &mut root).unwrap();
        fx.update(0.2, true, Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(fx.active(), 1);
        for _ in 0..20 {
            fx.update(0.2, false, Vec3::ZERO, Vec3::NEG_Z);
        }
        assert_eq!(fx.active(), 0);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut root = rng(Some(1));
        let config = AmbientParticleConfig { capacity: 0, ..Default::default() };
        assert!(AmbientEffects::new(config, &mut root).is_err());
    }
}
