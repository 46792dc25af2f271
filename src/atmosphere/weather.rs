//! Rain cycle.
//!
//! Every `interval` seconds a roll decides whether it rains. While raining,
//! the number of drops emitted per tick climbs by one every `rain_delta`
//! seconds, the storm blend ramps up and fog closes in. Once rain stops the
//! emission count winds down one step at a time, and the sky and fog only
//! start to recover after it reaches zero.

use rand::Rng;

use crate::core::random::SimRng;
use crate::core::types::{Result, Vec2, Vec3, Vec4};
use crate::particles::{ParticlePool, RainUpdater};

use super::config::WeatherConfig;
use super::fog::FogState;

/// Rain state machine and its particle pool
#[derive(Debug)]
pub struct WeatherSimulator {
    config: WeatherConfig,
    rng: SimRng,
    rain: ParticlePool,
    raining: bool,
    interval_timer: f32,
    rain_timer: f32,
    /// Drops emitted per tick
    pending: usize,
    lerp: f32,
    weather_sky: Vec4,
    fog: FogState,
}

impl WeatherSimulator {
    /// `rng` drives the rain rolls and drop sizes; `rain_rng` places drops.
    pub fn new(config: WeatherConfig, fog: FogState, rng: SimRng, rain_rng: SimRng) -> Result<Self> {
        let rain = ParticlePool::new(
            config.capacity,
            config.lifetime,
            Box::new(RainUpdater::new(rain_rng)),
        )?;
        Ok(Self {
            interval_timer: config.interval,
            rain_timer: config.rain_delta,
            config,
            rng,
            rain,
            raining: false,
            pending: 0,
            lerp: 0.0,
            weather_sky: Vec4::ONE,
            fog,
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    pub fn is_raining(&self) -> bool {
        self.raining
    }

    /// Drops emitted per tick
    #[inline]
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Storm blend amount, in [0, max_lerp]
    #[inline]
    pub fn lerp_amount(&self) -> f32 {
        self.lerp
    }

    #[inline]
    pub fn weather_sky(&self) -> Vec4 {
        self.weather_sky
    }

    #[inline]
    pub fn fog(&self) -> &FogState {
        &self.fog
    }

    #[inline]
    pub fn rain(&self) -> &ParticlePool {
        &self.rain
    }

    /// Rain loop volume: live drops over pool capacity
    pub fn volume(&self) -> f32 {
        self.rain.active() as f32 / self.rain.capacity() as f32
    }

    /// Force the rain state, as a roll would
    pub fn set_raining(&mut self, raining: bool) {
        self.raining = raining;
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// Advance by `dt`. Ramps scale with the day/night `cycle_speed`.
    pub fn tick(&mut self, dt: f32, cycle_speed: f32, eye: Vec3, look: Vec3) {
        self.interval_timer -= dt;
        if self.interval_timer <= 0.0 {
            let was_raining = self.raining;
            self.raining = self.rng.r#gen::<f32>() <= self.config.probability;
            self.interval_timer = self.config.interval;
            if self.raining != was_raining {
                log::debug!("Rain {}", if self.raining { "starting" } else { "stopping" });
            }
        }

        let sky_step = cycle_speed * dt * self.config.sky_rate;
        let fog_step = cycle_speed * dt * self.config.fog_rate;

        if self.raining {
            self.rain_timer -= dt;
            if self.rain_timer < 0.0 {
                self.rain_timer = self.config.rain_delta;
                if self.rain.active() + self.pending < self.rain.capacity() {
                    self.pending += 1;
                }
            }

            self.weather_sky = Vec4::ZERO;
            self.lerp = (self.lerp + sky_step * 2.0).min(self.config.max_lerp);
            self.fog.thicken(
                fog_step * 2.0,
                self.config.fog_start_floor,
                self.config.fog_range_floor,
            );
        } else {
            self.rain_timer += dt;
            if self.rain_timer > self.config.rain_delta {
                self.rain_timer = 0.0;
                if self.pending == 0 {
                    self.rain_timer = self.config.rain_delta;
                } else {
                    self.pending -= 1;
                }
            }

            if self.pending == 0 {
                self.lerp = (self.lerp - sky_step).max(0.0);
                self.fog.clear(fog_step);
            }
        }

        if self.pending > 0 {
            let direction = Vec3::from(self.config.direction).normalize_or_zero();
            let jitter = self.rng.r#gen::<f32>() * self.config.size_jitter;
            let size = Vec2::new(self.config.size[0], self.config.size[1] + jitter);
            self.rain.emit_many(self.pending, direction, size, self.config.speed);
        }
        self.rain.update(dt, eye, look);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::rng;

    fn weather(seed: u64) -> WeatherSimulator {
        WeatherSimulator::new(
            WeatherConfig::default(),
            FogState::new(1000.0, 2000.0),
            rng(Some(seed)),
            rng(Some(seed + 1000)),
        )
        .unwrap()
    }

    #[test]
    fn test_first_roll_follows_seeded_draw() {
        for seed in 0..20 {
            let expected = rng(Some(seed)).r#gen::<f32>() <= 0.25;
            let mut w = weather(seed);
            for _ in 0..29 {
                w.tick(1.0, 0.25, Vec3::ZERO, Vec3::NEG_Z);
                assert!(!w.is_raining());
            }
            w.tick(1.0, 0.25, Vec3::ZERO, Vec3::NEG_Z);
            assert_eq!(w.is_raining(), expected, "seed {}", seed);
        }
    }

    #[test]
    fn test_rain_ramps_emission_and_storm() {
        let config = WeatherConfig { interval: 1.0e9, ..Default::default() };
        let mut w = WeatherSimulator::new(config, FogState::new(1000.0, 2000.0), rng(Some(1)), rng(Some(2))).unwrap();
        w.set_raining(true);

        // rain_timer starts at 5 s; one more drop per tick every 5 s
        for _ in 0..6 {
            w.tick(1.0, 0.25, Vec3::ZERO, Vec3::NEG_Z);
        }
        assert_eq!(w.pending(), 1);
        assert_eq!(w.weather_sky(), Vec4::ZERO);
        assert!(w.rain().active() > 0);
        assert!(w.volume() > 0.0);

        for _ in 0..600 {
            w.tick(1.0, 0.25, Vec3::ZERO, Vec3::NEG_Z);
        }
        assert!((w.lerp_amount() - 0.5).abs() < 1e-6);
        assert!((w.fog().start - 150.0).abs() < 1e-3);
        assert!((w.fog().range - 800.0).abs() < 1e-3);
        assert!(w.rain().active() <= w.rain().capacity());
    }

    #[test]
    fn test_pending_never_outgrows_free_capacity() {
        let config = WeatherConfig {
            interval: 0.05,
            probability: 1.0,
            rain_delta: 0.01,
            capacity: 32,
            lifetime: 10.0,
            ..Default::default()
        };
        let capacity = config.capacity;
        let mut w = WeatherSimulator::new(config, FogState::new(1000.0, 2000.0), rng(Some(7)), rng(Some(8))).unwrap();
        w.set_raining(true);

        let mut saturated = false;
        for tick in 0..2000 {
            // the cap is checked against the count left by the previous update
            let active_before = w.rain().active();
            let pending_before = w.pending();
            w.tick(0.02, 0.25, Vec3::ZERO, Vec3::NEG_Z);

            assert!(w.is_raining(), "tick {}", tick);
            if w.pending() > pending_before {
                assert!(
                    active_before + w.pending() <= capacity,
                    "tick {}: {} live + {} pending > {}",
                    tick, active_before, w.pending(), capacity
                );
            }
            assert!(w.rain().active() <= capacity, "tick {}", tick);
            assert!(w.pending() <= capacity, "tick {}", tick);
            saturated |= w.rain().active() == capacity;
        }
        assert!(saturated);
        assert!(w.pending() < capacity, "pending = {}", w.pending());
    }

    #[test]
    fn test_recovery_waits_for_emission_to_stop() {
        let config = WeatherConfig { interval: 1.0e9, ..Default::default() };
        let mut w = WeatherSimulator::new(config, FogState::new(1000.0, 2000.0), rng(Some(1)), rng(Some(2))).unwrap();
        w.set_raining(true);
        for _ in 0..30 {
            w.tick(1.0, 0.25, Vec3::ZERO, Vec3::NEG_Z);
        }
        let pending = w.pending();
        assert!(pending >= 2, "pending = {}", pending);
        let storm = w.lerp_amount();

        w.set_raining(false);
        w.tick(1.0, 0.25, Vec3::ZERO, Vec3::NEG_Z);
        // still emitting, so the storm holds
        assert!(w.pending() > 0);
        assert_eq!(w.lerp_amount(), storm);

        for _ in 0..(pending * 6 + 1000) {
            w.tick(1.0, 0.25, Vec3::ZERO, Vec3::NEG_Z);
        }
        assert_eq!(w.pending(), 0);
        assert_eq!(w.lerp_amount(), 0.0);
        assert!(w.fog().is_clear());
        assert_eq!(w.rain().active(), 0);
    }
}
