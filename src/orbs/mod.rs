//! Collectible orbs.
//!
//! Outdoor levels place orbs as ordinary meshes named after their kind. At
//! load those meshes are pulled out of the static mesh list and replaced by
//! spinning, bobbing spheres that the camera collects by touching them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::random::{unit, SimRng};
use crate::core::types::{Mat4, Vec3, Vec4};
use crate::core::Camera;
use crate::geometry::{GeometryCache, IcosphereMesh, SphereClass};
use crate::level::{Level, LevelType};
use crate::math::Frustum;

/// Orb settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbConfig {
    /// Pickup sphere radius
    pub collision_radius: f32,
    /// Visual sphere radius, also used for culling
    pub bounds_radius: f32,
    /// Unscaled orbs hover this fraction of the camera height above ground
    pub hover_factor: f32,
    /// Distance at which the secret orb loop falls silent
    pub secret_audio_range: f32,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            collision_radius: 9.0,
            bounds_radius: 3.0,
            hover_factor: 0.75,
            secret_audio_range: 100.0,
        }
    }
}

/// Orb category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrbKind {
    Health,
    Agility,
    Secret,
}

impl OrbKind {
    pub const ALL: [OrbKind; 3] = [OrbKind::Health, OrbKind::Agility, OrbKind::Secret];

    /// Kind placed by a mesh file of this name
    pub fn from_mesh_name(name: &str) -> Option<Self> {
        match name {
            "healthOrb.m3d" => Some(OrbKind::Health),
            "agilityOrb.m3d" => Some(OrbKind::Agility),
            "secretOrb.m3d" => Some(OrbKind::Secret),
            _ => None,
        }
    }

    pub fn tint(self) -> Vec4 {
        match self {
            OrbKind::Health => Vec4::new(1.0, 0.25, 0.35, 1.0),
            OrbKind::Agility => Vec4::new(0.5, 1.0, 0.75, 1.0),
            OrbKind::Secret => Vec4::new(0.5, 0.75, 1.0, 1.0),
        }
    }

    fn index(self) -> usize {
        match self {
            OrbKind::Health => 0,
            OrbKind::Agility => 1,
            OrbKind::Secret => 2,
        }
    }
}

/// A single orb
#[derive(Clone, Debug)]
pub struct Orb {
    pub kind: OrbKind,
    position: Vec3,
    angle: f32,
    /// Bob frequency multiplier in [1, 2)
    phase: f32,
    alive: bool,
    world: Mat4,
}

impl Orb {
    pub fn new(kind: OrbKind, position: Vec3, phase: f32) -> Self {
        Self {
            kind,
            position,
            angle: 0.0,
            phase,
            alive: true,
            world: Mat4::from_translation(position),
        }
    }

    /// Rest position, before bobbing
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    /// Spin about Y and bob around the rest height
    pub fn update(&mut self, dt: f32) {
        if !self.alive {
            return;
        }
        self.angle += dt;
        let bob = (self.angle * self.phase).cos();
        self.world = Mat4::from_translation(self.position + Vec3::new(0.0, bob, 0.0))
            * Mat4::from_rotation_y(self.angle);
    }
}

/// Per-kind orb counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OrbTally {
    pub alive: usize,
    pub total: usize,
    pub collected: usize,
}

/// Every orb in a level plus the secret-orb audio cue
#[derive(Debug)]
pub struct OrbField {
    config: OrbConfig,
    orbs: Vec<Orb>,
    geometry: Arc<IcosphereMesh>,
    collected: [usize; 3],
    secret_volume: f32,
}

impl OrbField {
    /// Pull orb meshes out of `level` and turn them into orbs.
    ///
    /// Indoor levels keep their meshes and get no orbs.
    pub fn from_level(
        level: &mut Level,
        config: OrbConfig,
        geometry: &mut GeometryCache,
        rng: &mut SimRng,
    ) -> Self {
        let mut orbs = Vec::new();
        if level.level_type == LevelType::Outdoor {
            let hover = level.camera_height_offset * config.hover_factor;
            let terrain = &level.terrain;
            level.meshes.retain(|mesh| {
                let Some(kind) = OrbKind::from_mesh_name(mesh.file_name()) else {
                    return true;
                };
                let mut position = mesh.position();
                if mesh.scale() == 1.0 {
                    position.y = terrain.height(position.x, position.z) + hover;
                }
                orbs.push(Orb::new(kind, position, unit(rng) + 1.0));
                false
            });
            log::info!("Placed {} orbs", orbs.len());
        }
        Self::new(config, orbs, geometry)
    }

    pub fn new(config: OrbConfig, orbs: Vec<Orb>, geometry: &mut GeometryCache) -> Self {
        Self {
            geometry: geometry.sphere(SphereClass::Orb, config.bounds_radius),
            config,
            orbs,
            collected: [0; 3],
            secret_volume: 0.0,
        }
    }

    pub fn orbs(&self) -> &[Orb] {
        &self.orbs
    }

    /// Shared sphere drawn for every orb
    pub fn geometry(&self) -> &Arc<IcosphereMesh> {
        &self.geometry
    }

    /// Volume of the secret orb proximity loop
    #[inline]
    pub fn secret_volume(&self) -> f32 {
        self.secret_volume
    }

    pub fn tally(&self, kind: OrbKind) -> OrbTally {
        let of_kind = self.orbs.iter().filter(|o| o.kind == kind);
        OrbTally {
            alive: of_kind.clone().filter(|o| o.alive).count(),
            total: of_kind.count(),
            collected: self.collected[kind.index()],
        }
    }

    /// Live orbs in view
    pub fn visible<'a>(&'a self, frustum: &'a Frustum) -> impl Iterator<Item = &'a Orb> + 'a {
        let r = self.config.bounds_radius;
        self.orbs
            .iter()
            .filter(move |o| o.alive && frustum.intersects_sphere(o.position, r))
    }

    /// Animate every orb and collect those touching the camera. Returns the
    /// kinds collected this tick.
    pub fn update(&mut self, camera: &Camera, dt: f32) -> Vec<OrbKind> {
        let eye = camera.position;
        let camera_box = camera.aabb();
        let mut collected = Vec::new();
        let mut nearest_secret: Option<f32> = None;

        for orb in &mut self.orbs {
            orb.update(dt);
            if !orb.alive {
                continue;
            }
            if orb.kind == OrbKind::Secret {
                let d = orb.position.distance(eye);
                nearest_secret = Some(nearest_secret.map_or(d, |n| n.min(d)));
            }
            if camera_box.intersects_sphere(orb.position, self.config.collision_radius) {
                orb.alive = false;
                self.collected[orb.kind.index()] += 1;
                collected.push(orb.kind);
                log::debug!("Collected {:?} orb at {:?}", orb.kind, orb.position);
            }
        }

        match nearest_secret {
            Some(d) => {
                self.secret_volume = 1.0 - (d / self.config.secret_audio_range).min(1.0);
            }
            None => {
                if self.secret_volume - dt >= 0.0 {
                    self.secret_volume -= dt;
                }
            }
        }
        collected
    }
}
