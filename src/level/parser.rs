//! Level description parser.
//!
//! The format is line oriented. Top-level directives start with a keyword;
//! multi-line blocks (lights, sections, billboards, meshes) are followed by a
//! fixed sequence of value lines whose values start at the second token.
//! The leading label on value lines is informational and not checked, but
//! every value line must be present and carry numbers where numbers are
//! expected. Unrecognized top-level lines are ignored.
//!
//! Parsing is pure: file names are recorded, not resolved. See
//! [`crate::level::Level::build`] for the loading step.

use crate::core::lines::{Line, LineReader};
use crate::core::types::{Result, Vec2, Vec3, Vec4};
use crate::level::light::{Light, LightType};
use crate::level::surfaces::{SurfaceDesc, WaterDesc};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LevelType {
    #[default]
    Outdoor,
    Indoor,
}

/// `AMBIENT_SFX` loop plus the optional weather and underwater loops
#[derive(Clone, Debug, PartialEq)]
pub struct AmbientSound {
    pub file: String,
    pub volume: f32,
    pub pitch: f32,
    pub weather_file: Option<String>,
    pub water_file: Option<String>,
}

/// `# SKY_FOG` section values
#[derive(Clone, Debug, PartialEq)]
pub struct SkyFogDesc {
    pub texture: String,
    pub texture_scale: f32,
    /// Noon sky colour
    pub color: Vec4,
    pub dark_sky_offset: f32,
    pub fog_start: f32,
    pub fog_range: f32,
}

impl Default for SkyFogDesc {
    fn default() -> Self {
        Self {
            texture: String::new(),
            texture_scale: 1.0,
            color: Vec4::new(0.5, 0.7, 1.0, 1.0),
            dark_sky_offset: 0.0,
            fog_start: 500.0,
            fog_range: 2000.0,
        }
    }
}

/// `# TERRAIN` section values
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainDesc {
    pub heightmap: String,
    pub low_texture: String,
    pub high_texture: String,
    pub texture_scale: f32,
    pub spacing: f32,
    pub height_scale: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BillboardDesc {
    pub texture: String,
    pub position: Vec3,
    pub size: Vec2,
}

/// A `NEW_MESH` block
#[derive(Clone, Debug, PartialEq)]
pub struct MeshPlacement {
    pub file: String,
    pub position: Vec3,
    /// Per-axis rotation in radians
    pub rotation: Vec3,
    pub scale: f32,
}

/// Everything a level file declares, in file order where order matters
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelDescription {
    pub title: String,
    pub level_type: LevelType,
    pub background_music: Option<String>,
    pub ambient_sound: Option<AmbientSound>,
    pub footsteps: Option<(String, String)>,
    pub camera_start_position: Vec3,
    pub camera_start_direction: Vec3,
    pub camera_height_offset: f32,
    pub lights: Vec<Light>,
    pub sky_fog: SkyFogDesc,
    pub water: Option<WaterDesc>,
    pub terrain: Option<TerrainDesc>,
    pub surface: Option<SurfaceDesc>,
    pub billboards: Vec<BillboardDesc>,
    /// Template for the grass field
    pub grass_billboard: Option<BillboardDesc>,
    /// `MESH_NAME` preload hints
    pub preload_meshes: Vec<String>,
    pub meshes: Vec<MeshPlacement>,
}

// ---------------------------------------------------------------------------
// Value lines
// ---------------------------------------------------------------------------

fn string_value(reader: &mut LineReader<'_>, what: &str) -> Result<String> {
    Ok(reader.expect_line(what)?.token(1, what)?.to_string())
}

fn f32_value(reader: &mut LineReader<'_>, what: &str) -> Result<f32> {
    reader.expect_line(what)?.f32_at(1, what)
}

fn vec2_value(reader: &mut LineReader<'_>, what: &str) -> Result<Vec2> {
    reader.expect_line(what)?.vec2_at(1, what)
}

fn vec3_value(reader: &mut LineReader<'_>, what: &str) -> Result<Vec3> {
    reader.expect_line(what)?.vec3_at(1, what)
}

fn vec4_value(reader: &mut LineReader<'_>, what: &str) -> Result<Vec4> {
    reader.expect_line(what)?.vec4_at(1, what)
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

fn parse_light(reader: &mut LineReader<'_>) -> Result<Light> {
    let line = reader.expect_line("light type")?;
    let keyword = line.token(1, "light type")?;
    let kind = LightType::from_keyword(keyword).unwrap_or_else(|| {
        log::warn!(
            "{}:{}: unknown light type '{}', using DIRECTIONAL",
            reader.source_name(), line.number, keyword
        );
        LightType::Directional
    });

    let position = vec3_value(reader, "light position")?;
    let line = reader.expect_line("light direction")?;
    let raw_direction = line.vec3_at(1, "light direction")?;
    let direction = raw_direction
        .try_normalize()
        .ok_or_else(|| line.error("light direction must be non-zero"))?;
    let ambient = vec4_value(reader, "light ambient colour")?;
    let diffuse = vec4_value(reader, "light diffuse colour")?;
    let specular = vec4_value(reader, "light specular colour")?;
    let size = f32_value(reader, "light size")?;
    // one separator line closes the block, whatever it holds
    let _separator = reader.next_line();

    Ok(Light { kind, position, direction, ambient, diffuse, specular, size })
}

fn parse_sky_fog(reader: &mut LineReader<'_>) -> Result<SkyFogDesc> {
    Ok(SkyFogDesc {
        texture: string_value(reader, "sky texture")?,
        texture_scale: f32_value(reader, "sky texture scale")?,
        color: vec4_value(reader, "sky colour")?,
        dark_sky_offset: f32_value(reader, "dark sky offset")?,
        fog_start: f32_value(reader, "fog start")?,
        fog_range: f32_value(reader, "fog range")?,
    })
}

fn parse_water(reader: &mut LineReader<'_>) -> Result<WaterDesc> {
    Ok(WaterDesc {
        height: f32_value(reader, "water height")?,
        color: vec4_value(reader, "water colour")?,
        normal_map: string_value(reader, "water normal map")?,
        texture_scale: f32_value(reader, "water texture scale")?,
        transparency_ratio: f32_value(reader, "water transparency ratio")?,
        deep_fog_distance: f32_value(reader, "deep water fog distance")?,
        reflection: f32_value(reader, "water reflection amount")?,
        refraction: f32_value(reader, "water refraction amount")?,
        wave_height: f32_value(reader, "wave height")?,
        wave_speed: f32_value(reader, "wave speed")?,
    })
}

fn parse_terrain(reader: &mut LineReader<'_>) -> Result<TerrainDesc> {
    Ok(TerrainDesc {
        heightmap: string_value(reader, "heightmap file")?,
        low_texture: string_value(reader, "low terrain texture")?,
        high_texture: string_value(reader, "high terrain texture")?,
        texture_scale: f32_value(reader, "terrain texture scale")?,
        spacing: f32_value(reader, "terrain spacing")?,
        height_scale: f32_value(reader, "terrain height scale")?,
    })
}

fn parse_surface(reader: &mut LineReader<'_>) -> Result<SurfaceDesc> {
    Ok(SurfaceDesc {
        height: f32_value(reader, "surface height")?,
        diffuse_map: string_value(reader, "surface diffuse map")?,
        specular_map: string_value(reader, "surface specular map")?,
        normal_map: string_value(reader, "surface normal map")?,
        texture_scale: f32_value(reader, "surface texture scale")?,
    })
}

fn parse_billboard(reader: &mut LineReader<'_>) -> Result<BillboardDesc> {
    Ok(BillboardDesc {
        texture: string_value(reader, "billboard texture")?,
        position: vec3_value(reader, "billboard position")?,
        size: vec2_value(reader, "billboard size")?,
    })
}

fn parse_mesh_placement(reader: &mut LineReader<'_>, file: String) -> Result<MeshPlacement> {
    Ok(MeshPlacement {
        file,
        position: vec3_value(reader, "mesh position")?,
        rotation: vec3_value(reader, "mesh rotation")?,
        scale: f32_value(reader, "mesh scale")?,
    })
}

fn parse_ambient(line: &Line<'_>) -> Result<AmbientSound> {
    let extended = line.tokens().len() == 6;
    Ok(AmbientSound {
        file: line.token(1, "ambient sound file")?.to_string(),
        volume: line.f32_at(2, "ambient volume")?,
        pitch: line.f32_at(3, "ambient pitch")?,
        weather_file: extended.then(|| line.tokens()[4].to_string()),
        water_file: extended.then(|| line.tokens()[5].to_string()),
    })
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Parse a level document. `source_name` appears in error messages.
pub fn parse_level(source_name: &str, text: &str) -> Result<LevelDescription> {
    let mut reader = LineReader::new(source_name, text);
    let mut level = LevelDescription::default();

    while let Some(line) = reader.next_line() {
        match line.keyword() {
            "LEVEL_TITLE" => level.title = line.rest().to_string(),
            "LEVEL_TYPE" => {
                level.level_type = match line.token(1, "level type")? {
                    "OUTDOOR" => LevelType::Outdoor,
                    "INDOOR" => LevelType::Indoor,
                    other => {
                        return Err(line.error(format!(
                            "expected INDOOR or OUTDOOR, found '{}'", other
                        )));
                    }
                };
            }
            "BACKGROUND_MUSIC" => {
                let file = line.rest();
                if file.is_empty() {
                    return Err(line.error("expected music file name"));
                }
                level.background_music = Some(file.to_string());
            }
            "AMBIENT_SFX" => level.ambient_sound = Some(parse_ambient(&line)?),
            "FOOTSTEP_SFXs" => {
                level.footsteps = Some((
                    line.token(1, "first footstep sound")?.to_string(),
                    line.token(2, "second footstep sound")?.to_string(),
                ));
            }
            "CAMERA_START_POSITION" => {
                level.camera_start_position = line.vec3_at(1, "camera start position")?;
            }
            "CAMERA_START_DIRECTION" => {
                level.camera_start_direction = line.vec3_at(1, "camera start direction")?;
            }
            "CAMERA_HEIGHT_OFFSET" => {
                level.camera_height_offset = line.f32_at(1, "camera height offset")?;
            }
            "NUM_LIGHTS" => {
                let count = line.usize_at(1, "light count")?;
                reader.skip_blank();
                level.lights = (0..count)
                    .map(|_| parse_light(&mut reader))
                    .collect::<Result<_>>()?;
            }
            "#" => match line.tokens().get(1).copied() {
                Some("SKY_FOG") => level.sky_fog = parse_sky_fog(&mut reader)?,
                Some("WATER") => level.water = Some(parse_water(&mut reader)?),
                Some("TERRAIN") => level.terrain = Some(parse_terrain(&mut reader)?),
                Some("SURFACE") => level.surface = Some(parse_surface(&mut reader)?),
                _ => {}
            },
            "NEW_BILLBOARD" => {
                let grass = line.tokens().get(1) == Some(&"GRASS_BILLBOARD");
                let billboard = parse_billboard(&mut reader)?;
                if grass {
                    level.grass_billboard = Some(billboard);
                } else {
                    level.billboards.push(billboard);
                }
            }
            "MESH_NAME" => {
                level.preload_meshes.push(line.token(1, "mesh file")?.to_string());
            }
            "NEW_MESH" => {
                let file = line.token(1, "mesh file")?.to_string();
                level.meshes.push(parse_mesh_placement(&mut reader, file)?);
            }
            _ => {}
        }
    }

    log::debug!(
        "Parsed level '{}': {} lights, {} meshes, {} billboards",
        level.title,
        level.lights.len(),
        level.meshes.len(),
        level.billboards.len()
    );
    Ok(level)
}
