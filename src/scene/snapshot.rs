//! Per-tick output handed to the renderer and audio backend.
//!
//! Vectors and matrices are flattened to arrays so the snapshot serializes
//! without glam's serde support.

use serde::Serialize;

use crate::atmosphere::{DayPhase, FogState};
use crate::level::{Billboard, Light, LightType};
use crate::math::Aabb;
use crate::mesh::Mesh;
use crate::orbs::{Orb, OrbKind, OrbTally};
use crate::particles::Particle;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AabbSnapshot {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl From<&Aabb> for AabbSnapshot {
    fn from(aabb: &Aabb) -> Self {
        Self {
            min: aabb.min.to_array(),
            max: aabb.max.to_array(),
        }
    }
}

/// The interpolated light
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LightSnapshot {
    pub kind: LightType,
    pub position: [f32; 3],
    pub direction: [f32; 3],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub size: f32,
    pub view_projection: [f32; 16],
}

impl From<&Light> for LightSnapshot {
    fn from(light: &Light) -> Self {
        Self {
            kind: light.kind,
            position: light.position.to_array(),
            direction: light.direction.to_array(),
            ambient: light.ambient.to_array(),
            diffuse: light.diffuse.to_array(),
            specular: light.specular.to_array(),
            size: light.size,
            view_projection: light.view_projection().to_cols_array(),
        }
    }
}

/// One mesh instance to draw
#[derive(Clone, Debug, Serialize)]
pub struct MeshDraw {
    pub name: String,
    pub world: [f32; 16],
    pub aabb: AabbSnapshot,
    pub subset_aabbs: Vec<AabbSnapshot>,
    /// Whether the mesh box touches the view frustum
    pub in_view: bool,
}

impl MeshDraw {
    pub fn new(mesh: &Mesh, in_view: bool) -> Self {
        Self {
            name: mesh.file_name().to_string(),
            world: mesh.world_matrix().to_cols_array(),
            aabb: mesh.aabb().into(),
            subset_aabbs: mesh.subset_aabbs().iter().map(AabbSnapshot::from).collect(),
            in_view,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BillboardSnapshot {
    pub position: [f32; 3],
    pub size: [f32; 2],
    /// Texture handle id
    pub texture: Option<u32>,
}

impl From<&Billboard> for BillboardSnapshot {
    fn from(b: &Billboard) -> Self {
        Self {
            position: b.position().to_array(),
            size: b.size().to_array(),
            texture: b.texture.map(|t| t.id),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ParticleSnapshot {
    pub position: [f32; 3],
    pub size: [f32; 2],
}

impl From<&Particle> for ParticleSnapshot {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.position.to_array(),
            size: p.size.to_array(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OrbSnapshot {
    pub kind: OrbKind,
    pub world: [f32; 16],
    pub tint: [f32; 4],
}

impl From<&Orb> for OrbSnapshot {
    fn from(orb: &Orb) -> Self {
        Self {
            kind: orb.kind,
            world: orb.world_matrix().to_cols_array(),
            tint: orb.kind.tint().to_array(),
        }
    }
}

/// Loop volumes in [0, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct AudioLevels {
    /// Rain loop: live drops over pool capacity
    pub weather: f32,
    /// Underwater loop: depth below the water line over the deep-fog distance
    pub underwater: f32,
    /// Secret orb proximity loop
    pub secret_orb: f32,
}

/// Everything the host needs to draw and play one frame
#[derive(Clone, Debug, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub elapsed: f32,
    pub phase: DayPhase,
    pub light_degrees: f32,
    pub light: LightSnapshot,
    pub sky_color: [f32; 4],
    pub fog: FogState,
    pub raining: bool,
    pub storm: f32,
    pub water_height: f32,
    pub meshes: Vec<MeshDraw>,
    pub billboards: Vec<BillboardSnapshot>,
    pub grass: Vec<BillboardSnapshot>,
    pub rain: Vec<ParticleSnapshot>,
    pub ambient_particles: Vec<ParticleSnapshot>,
    pub orbs: Vec<OrbSnapshot>,
    pub orb_tallies: Vec<(OrbKind, OrbTally)>,
    pub audio: AudioLevels,
}
