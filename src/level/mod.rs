//! Levels: parsed description plus the loaded geometry and asset handles.
//!
//! Loading happens in two steps. [`parser::parse_level`] turns the text into a
//! [`LevelDescription`] without touching the filesystem, then
//! [`Level::build`] resolves heightmaps, meshes and assets.

pub mod assets;
pub mod light;
pub mod billboard;
pub mod surfaces;
pub mod parser;

pub use assets::{AssetHandle, AssetKind, AssetLoader, ContentPaths, DirectoryAssets, MemoryAssets};
pub use billboard::Billboard;
pub use light::{Light, LightType};
pub use parser::{parse_level, LevelDescription, LevelType, SkyFogDesc};
pub use surfaces::{Surface, Water, WATER_DISABLED_HEIGHT};

use std::path::Path;
use std::sync::Arc;

use crate::core::types::{Result, Vec3, Vec4};
use crate::geometry::{GeometryCache, IcosphereMesh, SphereClass};
use crate::mesh::{Mesh, MeshCache};
use crate::terrain::height_field::{SKIRT_GRID, SKIRT_SPACING};
use crate::terrain::TerrainHeightField;

/// Sky dome radius
pub const SKY_DOME_RADIUS: f32 = 8000.0;

/// Sky dome and its texture
#[derive(Clone, Debug)]
pub struct Sky {
    pub texture: Option<AssetHandle>,
    pub texture_scale: f32,
    /// Noon sky colour
    pub color: Vec4,
    pub dark_sky_offset: f32,
    pub dome: Arc<IcosphereMesh>,
}

/// Ambient, weather and underwater loops
#[derive(Clone, Debug, Default)]
pub struct LevelAudio {
    pub music: Option<AssetHandle>,
    pub ambient: Option<AssetHandle>,
    pub ambient_volume: f32,
    pub ambient_pitch: f32,
    pub weather: Option<AssetHandle>,
    pub underwater: Option<AssetHandle>,
    pub footsteps: Option<(AssetHandle, AssetHandle)>,
}

/// A loaded level
#[derive(Debug)]
pub struct Level {
    pub title: String,
    pub level_type: LevelType,
    pub camera_start_position: Vec3,
    pub camera_start_direction: Vec3,
    pub camera_height_offset: f32,
    /// Stored lights; four or more drive the day/night cycle
    pub lights: Vec<Light>,
    pub sky: Sky,
    /// Fog start and range as declared
    pub fog_start: f32,
    pub fog_range: f32,
    pub audio: LevelAudio,
    pub terrain: TerrainHeightField,
    pub terrain_textures: Option<(AssetHandle, AssetHandle)>,
    /// Flat plane under the terrain that hides the world's edge
    pub skirt: TerrainHeightField,
    pub water: Option<Water>,
    pub surface: Option<Surface>,
    pub billboards: Vec<Billboard>,
    /// Template for the grass field
    pub grass_billboard: Option<Billboard>,
    pub meshes: Vec<Mesh>,
}

fn load_optional(assets: &mut dyn AssetLoader, kind: AssetKind, name: &Option<String>) -> Result<Option<AssetHandle>> {
    name.as_deref().map(|n| assets.load(kind, n)).transpose()
}

impl Level {
    /// Read, parse and build the level at `path`
    pub fn load(
        path: &Path,
        paths: &ContentPaths,
        meshes: &mut MeshCache,
        geometry: &mut GeometryCache,
        assets: &mut dyn AssetLoader,
    ) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let source_name = path.display().to_string();
        let desc = parse_level(&source_name, &text)?;
        Self::build(desc, paths, meshes, geometry, assets)
    }

    /// Resolve every file and asset a description names
    pub fn build(
        desc: LevelDescription,
        paths: &ContentPaths,
        meshes: &mut MeshCache,
        geometry: &mut GeometryCache,
        assets: &mut dyn AssetLoader,
    ) -> Result<Self> {
        let audio = LevelAudio {
            music: load_optional(assets, AssetKind::Music, &desc.background_music)?,
            ambient: desc
                .ambient_sound
                .as_ref()
                .map(|a| assets.load(AssetKind::Sound, &a.file))
                .transpose()?,
            ambient_volume: desc.ambient_sound.as_ref().map_or(0.0, |a| a.volume),
            ambient_pitch: desc.ambient_sound.as_ref().map_or(0.0, |a| a.pitch),
            weather: load_optional(
                assets,
                AssetKind::Sound,
                &desc.ambient_sound.as_ref().and_then(|a| a.weather_file.clone()),
            )?,
            underwater: load_optional(
                assets,
                AssetKind::Sound,
                &desc.ambient_sound.as_ref().and_then(|a| a.water_file.clone()),
            )?,
            footsteps: match &desc.footsteps {
                Some((a, b)) => Some((assets.load(AssetKind::Sound, a)?, assets.load(AssetKind::Sound, b)?)),
                None => None,
            },
        };

        let sky_fog = &desc.sky_fog;
        let sky = Sky {
            texture: if sky_fog.texture.is_empty() {
                None
            } else {
                Some(assets.load(AssetKind::Texture, &sky_fog.texture)?)
            },
            texture_scale: sky_fog.texture_scale,
            color: sky_fog.color,
            dark_sky_offset: sky_fog.dark_sky_offset,
            dome: geometry.sphere(SphereClass::SkyDome, SKY_DOME_RADIUS),
        };

        let (terrain, terrain_textures, skirt) = match &desc.terrain {
            Some(t) => {
                let field = TerrainHeightField::load(
                    &paths.terrain_path(&t.heightmap),
                    t.spacing,
                    t.height_scale,
                    t.texture_scale,
                )?;
                let textures = (
                    assets.load(AssetKind::Texture, &t.low_texture)?,
                    assets.load(AssetKind::Texture, &t.high_texture)?,
                );
                (field, Some(textures), TerrainHeightField::skirt(t.texture_scale)?)
            }
            None => {
                let height = desc.surface.as_ref().map_or(0.0, |s| s.height);
                let field = TerrainHeightField::flat(SKIRT_GRID, SKIRT_GRID, SKIRT_SPACING, 1.0, height)?;
                (field, None, TerrainHeightField::skirt(1.0)?)
            }
        };

        let water = desc.water.map(|w| Water::new(w, assets)).transpose()?;
        let surface = desc.surface.as_ref().map(|s| Surface::new(s, assets)).transpose()?;

        let mut make_billboard = |b: &parser::BillboardDesc| -> Result<Billboard> {
            let texture = assets.load(AssetKind::Texture, &b.texture)?;
            Ok(Billboard::new(b.position, b.size, Some(texture)))
        };
        let billboards = desc.billboards.iter().map(&mut make_billboard).collect::<Result<Vec<_>>>()?;
        let grass_billboard = desc.grass_billboard.as_ref().map(&mut make_billboard).transpose()?;

        for name in &desc.preload_meshes {
            meshes.preload(name, assets)?;
        }
        let mut placed = Vec::with_capacity(desc.meshes.len());
        for m in &desc.meshes {
            let mut mesh = meshes.load(&m.file, assets)?;
            mesh.set_transform(m.position, m.rotation, m.scale);
            placed.push(mesh);
        }

        log::info!(
            "Loaded level '{}' ({:?}): {} lights, {} meshes, {} billboards, water: {}",
            desc.title,
            desc.level_type,
            desc.lights.len(),
            placed.len(),
            billboards.len(),
            water.is_some()
        );

        Ok(Self {
            title: desc.title,
            level_type: desc.level_type,
            camera_start_position: desc.camera_start_position,
            camera_start_direction: desc.camera_start_direction,
            camera_height_offset: desc.camera_height_offset,
            lights: desc.lights,
            sky,
            fog_start: desc.sky_fog.fog_start,
            fog_range: desc.sky_fog.fog_range,
            audio,
            terrain,
            terrain_textures,
            skirt,
            water,
            surface,
            billboards,
            grass_billboard,
            meshes: placed,
        })
    }

    /// Whether the stored lights drive a day/night cycle
    pub fn has_day_night_cycle(&self) -> bool {
        self.lights.len() >= 4
    }

    /// Water line, or [`WATER_DISABLED_HEIGHT`] without water
    pub fn water_height(&self) -> f32 {
        self.water.as_ref().map_or(WATER_DISABLED_HEIGHT, Water::height)
    }

    /// Order static meshes nearest-first from `eye`
    pub fn sort_meshes(&mut self, eye: Vec3) {
        crate::mesh::sort_by_distance(&mut self.meshes, eye);
    }
}
