//! A running level.
//!
//! [`Scene`] owns the loaded level and every simulator that animates it.
//! The host calls [`Scene::tick`] once per frame with its camera and reads
//! the result back through [`Scene::snapshot`].

pub mod config;
pub mod snapshot;

pub use config::SceneConfig;
pub use snapshot::{AudioLevels, FrameSnapshot};

use std::path::Path;

use crate::atmosphere::{EnvironmentSimulator, FogState, WeatherSimulator};
use crate::core::random::{child, rng, SimRng};
use crate::core::types::Result;
use crate::core::Camera;
use crate::geometry::GeometryCache;
use crate::grass::GrassField;
use crate::level::{AssetLoader, Level, LevelType};
use crate::mesh::MeshCache;
use crate::orbs::{OrbField, OrbKind};
use crate::particles::AmbientEffects;

use snapshot::{BillboardSnapshot, LightSnapshot, MeshDraw, OrbSnapshot, ParticleSnapshot};

/// Level plus its environment, weather, particles, grass and orbs
#[derive(Debug)]
pub struct Scene {
    config: SceneConfig,
    level: Level,
    meshes: MeshCache,
    geometry: GeometryCache,
    environment: EnvironmentSimulator,
    weather: WeatherSimulator,
    ambient: AmbientEffects,
    grass: Option<GrassField>,
    orbs: OrbField,
    camera: Camera,
    audio: AudioLevels,
    tick: u64,
    elapsed: f32,
}

impl Scene {
    /// Load the level at `level_path` and set up every simulator
    pub fn load(level_path: &Path, config: SceneConfig, assets: &mut dyn AssetLoader) -> Result<Self> {
        let mut meshes = MeshCache::new(config.content.root.join(&config.content.meshes));
        let mut geometry = GeometryCache::new();
        let level = Level::load(level_path, &config.content, &mut meshes, &mut geometry, assets)?;
        Self::from_level(level, config, meshes, geometry)
    }

    /// Wrap an already built level
    pub fn from_level(
        mut level: Level,
        config: SceneConfig,
        meshes: MeshCache,
        mut geometry: GeometryCache,
    ) -> Result<Self> {
        let mut root: SimRng = rng(config.seed);

        let environment = EnvironmentSimulator::new(&level.lights, level.sky.color, config.day_night.clone());
        let weather = WeatherSimulator::new(
            config.weather.clone(),
            FogState::new(level.fog_start, level.fog_range),
            child(&mut root),
            child(&mut root),
        )?;
        let ambient = AmbientEffects::new(config.ambient.clone(), &mut root)?;

        let grass = match (&level.grass_billboard, level.level_type) {
            (Some(template), LevelType::Outdoor) => {
                Some(GrassField::new(config.grass.clone(), template, child(&mut root)))
            }
            _ => None,
        };
        let orbs = OrbField::from_level(&mut level, config.orbs.clone(), &mut geometry, &mut child(&mut root));

        let camera = Camera::new(level.camera_start_position, level.camera_start_direction);
        log::info!(
            "Scene ready: '{}', day/night {}, grass {}, {} orbs",
            level.title,
            if environment.is_cycling() { "cycling" } else { "static" },
            grass.as_ref().map_or(0, GrassField::len),
            orbs.orbs().len()
        );

        Ok(Self {
            config,
            level,
            meshes,
            geometry,
            environment,
            weather,
            ambient,
            grass,
            orbs,
            camera,
            audio: AudioLevels::default(),
            tick: 0,
            elapsed: 0.0,
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[inline]
    pub fn level(&self) -> &Level {
        &self.level
    }

    #[inline]
    pub fn environment(&self) -> &EnvironmentSimulator {
        &self.environment
    }

    #[inline]
    pub fn weather(&self) -> &WeatherSimulator {
        &self.weather
    }

    #[inline]
    pub fn ambient(&self) -> &AmbientEffects {
        &self.ambient
    }

    pub fn grass(&self) -> Option<&GrassField> {
        self.grass.as_ref()
    }

    #[inline]
    pub fn orbs(&self) -> &OrbField {
        &self.orbs
    }

    #[inline]
    pub fn mesh_cache(&self) -> &MeshCache {
        &self.meshes
    }

    #[inline]
    pub fn geometry(&self) -> &GeometryCache {
        &self.geometry
    }

    /// Camera from the latest tick, or the level's start pose
    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn audio(&self) -> AudioLevels {
        self.audio
    }

    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Advance every simulator by `dt` seconds. Returns the orbs collected
    /// during this tick.
    pub fn tick(&mut self, camera: &Camera, dt: f32) -> Vec<OrbKind> {
        let eye = camera.position;
        let look = camera.look;

        self.environment.tick(eye, dt);
        self.weather.tick(dt, self.environment.cycle_speed(), eye, look);
        self.environment
            .apply_weather(self.weather.lerp_amount(), self.weather.weather_sky());

        let emit_ambient = self.environment.emit_ambient() && self.weather.pending() == 0;
        self.ambient.update(dt, emit_ambient, eye, look);

        if let Some(grass) = &mut self.grass {
            grass.update(camera, &self.level.terrain, self.level.water_height());
        }
        let collected = self.orbs.update(camera, dt);

        self.level.sort_meshes(eye);
        self.audio = AudioLevels {
            weather: self.weather.volume(),
            underwater: self.level.water.as_ref().map_or(0.0, |w| w.submersion(eye.y)),
            secret_orb: self.orbs.secret_volume(),
        };

        self.camera = camera.clone();
        self.tick += 1;
        self.elapsed += dt;
        collected
    }

    /// Capture the state produced by the latest tick
    pub fn snapshot(&self) -> FrameSnapshot {
        let frustum = self.camera.frustum();
        let rain = self.weather.rain();

        FrameSnapshot {
            tick: self.tick,
            elapsed: self.elapsed,
            phase: self.environment.phase(),
            light_degrees: self.environment.theta().to_degrees(),
            light: LightSnapshot::from(self.environment.active_light()),
            sky_color: self.environment.sky_color().to_array(),
            fog: *self.weather.fog(),
            raining: self.weather.is_raining(),
            storm: self.weather.lerp_amount(),
            water_height: self.level.water_height(),
            meshes: self
                .level
                .meshes
                .iter()
                .map(|m| MeshDraw::new(m, frustum.intersects_aabb(m.aabb())))
                .collect(),
            billboards: self
                .level
                .billboards
                .iter()
                .filter(|b| b.visible)
                .map(BillboardSnapshot::from)
                .collect(),
            grass: self
                .grass
                .iter()
                .flat_map(GrassField::visible)
                .map(BillboardSnapshot::from)
                .collect(),
            rain: rain.alive().map(ParticleSnapshot::from).collect(),
            ambient_particles: self
                .ambient
                .pools()
                .iter()
                .flat_map(|p| p.alive())
                .map(ParticleSnapshot::from)
                .collect(),
            orbs: self.orbs.visible(&frustum).map(OrbSnapshot::from).collect(),
            orb_tallies: OrbKind::ALL.iter().map(|&k| (k, self.orbs.tally(k))).collect(),
            audio: self.audio,
        }
    }
}
