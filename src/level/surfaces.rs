//! Water and flat surface planes.
//!
//! Both are fixed-size grids centered on the origin. The water grid is wide
//! enough to reach the horizon; the surface plane is a coarse 3x3 grid used
//! as a floor in indoor levels.

use crate::core::types::{Mat4, Result, Vec3, Vec4};
use crate::core::Camera;
use crate::geometry::grid::{build_flat_grid, GridMesh, GridSpec};
use crate::geometry::VertexPosTangNormTex;
use crate::level::assets::{AssetHandle, AssetKind, AssetLoader};

/// Water height reported by levels without a water section
pub const WATER_DISABLED_HEIGHT: f32 = -10000.0;

pub const WATER_GRID: usize = 258;
pub const WATER_SPACING: f32 = 100.0;

pub const SURFACE_GRID: usize = 3;
pub const SURFACE_SPACING: f32 = 1000.0;

// ---------------------------------------------------------------------------
// Water
// ---------------------------------------------------------------------------

/// `# WATER` section values
#[derive(Clone, Debug, PartialEq)]
pub struct WaterDesc {
    pub height: f32,
    pub color: Vec4,
    pub normal_map: String,
    pub texture_scale: f32,
    pub transparency_ratio: f32,
    /// Depth over which underwater fog and audio reach full strength
    pub deep_fog_distance: f32,
    pub reflection: f32,
    pub refraction: f32,
    pub wave_height: f32,
    pub wave_speed: f32,
}

impl Default for WaterDesc {
    fn default() -> Self {
        Self {
            height: 0.0,
            color: Vec4::new(0.0, 0.2, 0.4, 1.0),
            normal_map: String::new(),
            texture_scale: 1.0,
            transparency_ratio: 0.5,
            deep_fog_distance: 100.0,
            reflection: 0.05,
            refraction: 0.035,
            wave_height: 0.0,
            wave_speed: 1.0,
        }
    }
}

/// Water plane with its grid geometry
#[derive(Clone, Debug)]
pub struct Water {
    pub desc: WaterDesc,
    pub normal_map: AssetHandle,
    pub vertices: Vec<VertexPosTangNormTex>,
    pub indices: Vec<u32>,
}

impl Water {
    pub fn new(desc: WaterDesc, assets: &mut dyn AssetLoader) -> Result<Self> {
        let normal_map = assets.load(AssetKind::Texture, &desc.normal_map)?;
        let spec = GridSpec::new(WATER_GRID, WATER_GRID, WATER_SPACING, desc.texture_scale);
        let GridMesh { vertices, indices } = build_flat_grid(&spec, desc.height);
        let vertices = vertices
            .into_iter()
            .map(|v| VertexPosTangNormTex {
                position: v.position,
                tangent: Vec3::X,
                normal: Vec3::Y,
                tex_coord: v.tex_coord,
            })
            .collect();
        Ok(Self { desc, normal_map, vertices, indices })
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.desc.height
    }

    /// Whether `point` lies below the water line
    pub fn is_below(&self, point: Vec3) -> bool {
        point.y < self.desc.height
    }

    /// Underwater strength for an eye at `camera_y`: 0 at the surface, 1 at
    /// the deep-fog distance or deeper
    pub fn submersion(&self, camera_y: f32) -> f32 {
        if self.desc.deep_fog_distance <= 0.0 {
            return if camera_y < self.desc.height { 1.0 } else { 0.0 };
        }
        ((self.desc.height - camera_y) / self.desc.deep_fog_distance).clamp(0.0, 1.0)
    }

    /// View matrix of the camera mirrored about the water plane
    pub fn reflection_view(&self, camera: &Camera) -> Mat4 {
        let look = Vec3::new(camera.look.x, -camera.look.y, camera.look.z);
        let mut position = camera.position;
        position.y = 2.0 * self.desc.height - position.y;
        let up = if look.cross(Vec3::Y).length_squared() < 1e-8 { Vec3::Z } else { Vec3::Y };
        Mat4::look_to_rh(position, look, up)
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// `# SURFACE` section values
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceDesc {
    pub height: f32,
    pub diffuse_map: String,
    pub specular_map: String,
    pub normal_map: String,
    pub texture_scale: f32,
}

/// Flat textured floor
#[derive(Clone, Debug)]
pub struct Surface {
    pub height: f32,
    pub diffuse_map: AssetHandle,
    pub specular_map: AssetHandle,
    pub normal_map: AssetHandle,
    pub mesh: GridMesh,
}

impl Surface {
    pub fn new(desc: &SurfaceDesc, assets: &mut dyn AssetLoader) -> Result<Self> {
        let spec = GridSpec::new(SURFACE_GRID, SURFACE_GRID, SURFACE_SPACING, desc.texture_scale);
        Ok(Self {
            height: desc.height,
            diffuse_map: assets.load(AssetKind::Texture, &desc.diffuse_map)?,
            specular_map: assets.load(AssetKind::Texture, &desc.specular_map)?,
            normal_map: assets.load(AssetKind::Texture, &desc.normal_map)?,
            mesh: build_flat_grid(&spec, desc.height),
        })
    }
}
