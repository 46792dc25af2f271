//! Day/night lighting.
//!
//! The active light orbits about a horizontal axis while a signed angle θ
//! sweeps between ±max. Four stored lights stand for morning, noon, evening
//! and night; each light's ambient colour doubles as that phase's sky
//! colour, except noon, whose sky colour is the level's own.
//!
//! ```text
//!   θ > 0, toward evening   morning -> noon     f = 1 - θ/max
//!   θ ≤ 0, toward evening   noon -> evening     f = θ / -max
//!   θ ≤ 0, toward morning   evening -> night    f = min((max - |θ|) / (max - 90), 1)
//!   θ > 0, toward morning   night -> morning    f = 1 - min((max - |θ|) / (max - 90), 1)
//! ```

use crate::core::types::{Quat, Vec3, Vec4};
use crate::level::Light;

use super::config::DayNightConfig;

const MORNING: usize = 0;
const NOON: usize = 1;
const EVENING: usize = 2;
const NIGHT: usize = 3;

/// Phase of the day/night sweep
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum DayPhase {
    MorningToNoon,
    NoonToEvening,
    EveningToNight,
    NightToMorning,
    /// Cycling is off
    Static,
}

/// Drives the active light and sky colour
#[derive(Clone, Debug)]
pub struct EnvironmentSimulator {
    config: DayNightConfig,
    lights: Vec<Light>,
    noon_sky: Vec4,
    cycling: bool,
    /// Signed rotation in degrees
    degrees: f32,
    toward_evening: bool,
    noon_direction: Vec3,
    rotation_axis: Vec3,

    phase: DayPhase,
    fraction: f32,
    base_ambient: Vec4,
    base_sky: Vec4,
    active: Light,
    sky_color: Vec4,
    emit_ambient: bool,
}

impl EnvironmentSimulator {
    /// Simulator over the level's stored lights. Fewer than four lights give
    /// static lighting from the first one (or a default light when there are
    /// none).
    pub fn new(lights: &[Light], noon_sky: Vec4, config: DayNightConfig) -> Self {
        let lights: Vec<Light> = if lights.is_empty() {
            vec![Light::default()]
        } else {
            lights.to_vec()
        };
        let cycling = lights.len() >= 4;

        let noon_direction = if cycling {
            lights[NOON].direction
        } else {
            lights[0].direction
        };
        let rotation_axis = Vec3::new(noon_direction.x, 0.0, noon_direction.z)
            .cross(Vec3::Y)
            .try_normalize()
            .unwrap_or(Vec3::X);
        let degrees = if cycling { config.max_degrees } else { 0.0 };

        if !cycling {
            log::debug!("{} light(s): day/night cycle off", lights.len());
        }

        let mut sim = Self {
            active: lights[0].clone(),
            lights,
            noon_sky,
            cycling,
            degrees,
            toward_evening: cycling,
            noon_direction,
            rotation_axis,
            phase: DayPhase::Static,
            fraction: 0.0,
            base_ambient: Vec4::ZERO,
            base_sky: noon_sky,
            sky_color: noon_sky,
            emit_ambient: false,
            config,
        };
        sim.tick(Vec3::ZERO, 0.0);
        sim.apply_weather(0.0, Vec4::ONE);
        sim
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    pub fn is_cycling(&self) -> bool {
        self.cycling
    }

    /// Rotation angle in radians
    #[inline]
    pub fn theta(&self) -> f32 {
        self.degrees.to_radians()
    }

    #[inline]
    pub fn toward_evening(&self) -> bool {
        self.toward_evening
    }

    #[inline]
    pub fn phase(&self) -> DayPhase {
        self.phase
    }

    /// Blend fraction within the current phase, in [0, 1]
    #[inline]
    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    #[inline]
    pub fn active_light(&self) -> &Light {
        &self.active
    }

    #[inline]
    pub fn sky_color(&self) -> Vec4 {
        self.sky_color
    }

    /// Whether ambient motes may be emitted this tick
    #[inline]
    pub fn emit_ambient(&self) -> bool {
        self.emit_ambient
    }

    #[inline]
    pub fn cycle_speed(&self) -> f32 {
        self.config.cycle_speed
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// Advance θ and recompute the unweathered light and sky colour.
    /// Call [`apply_weather`](Self::apply_weather) afterwards.
    pub fn tick(&mut self, eye: Vec3, dt: f32) {
        let max = self.config.max_degrees;

        if self.cycling {
            let step = (dt * self.config.cycle_speed).to_degrees();
            if self.toward_evening {
                self.degrees -= step;
            } else {
                self.degrees += step;
            }
            if self.degrees < -max {
                self.toward_evening = false;
                self.degrees = -max;
            } else if self.degrees > max {
                self.toward_evening = true;
                self.degrees = max;
            }
        }

        let (from, to, sky_from, sky_to) = self.select_pair();
        let f = self.fraction;
        let (l0, l1) = (&self.lights[from], &self.lights[to]);

        self.base_ambient = l0.ambient.lerp(l1.ambient, f);
        self.active.diffuse = l0.diffuse.lerp(l1.diffuse, f);
        self.active.specular = l0.specular.lerp(l1.specular, f);
        self.active.size = l0.size * (1.0 - f) + l1.size * f;
        self.active.kind = l0.kind;
        self.base_sky = sky_from.lerp(sky_to, f);

        let rotation = Quat::from_axis_angle(self.rotation_axis, self.degrees.to_radians());
        self.active.direction = (rotation * self.noon_direction).normalize_or_zero();
        self.active.position = eye - self.active.direction * self.config.light_distance;

        self.emit_ambient = !self.toward_evening && (f == 0.0 || f == 1.0);
    }

    /// Darken ambient light and blend the sky toward `weather_sky` by
    /// `amount`
    pub fn apply_weather(&mut self, amount: f32, weather_sky: Vec4) {
        self.active.ambient = self.base_ambient * (1.0 - amount);
        let mut sky = self.base_sky.lerp(weather_sky, amount);
        sky.w = 1.0;
        self.sky_color = sky;
    }

    /// Pick the (light, light, sky, sky) pair for θ and set phase and fraction
    fn select_pair(&mut self) -> (usize, usize, Vec4, Vec4) {
        if !self.cycling {
            self.phase = DayPhase::Static;
            self.fraction = 0.0;
            return (0, 0, self.noon_sky, self.noon_sky);
        }

        let max = self.config.max_degrees;
        let degrees = self.degrees;
        let night = if max > 90.0 {
            ((max - degrees.abs()) / (max - 90.0)).min(1.0)
        } else {
            1.0
        };
        let ambient = |i: usize| self.lights[i].ambient;

        let (phase, fraction, pair) = match (degrees > 0.0, self.toward_evening) {
            (true, true) => (
                DayPhase::MorningToNoon,
                1.0 - degrees / max,
                (MORNING, NOON, ambient(MORNING), self.noon_sky),
            ),
            (true, false) => (
                DayPhase::NightToMorning,
                1.0 - night,
                (NIGHT, MORNING, ambient(NIGHT), ambient(MORNING)),
            ),
            (false, true) => (
                DayPhase::NoonToEvening,
                degrees / -max,
                (NOON, EVENING, self.noon_sky, ambient(EVENING)),
            ),
            (false, false) => (
                DayPhase::EveningToNight,
                night,
                (EVENING, NIGHT, ambient(EVENING), ambient(NIGHT)),
            ),
        };

        self.phase = phase;
        self.fraction = fraction.clamp(0.0, 1.0);
        pair
    }
}
