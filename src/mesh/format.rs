//! Text mesh format.
//!
//! ```text
//! <header>
//! x <material count>
//! x <vertex count>
//! x <triangle count>
//! <2 lines ignored>
//! per material:
//!   <diffuse map | NO_TEXTURE>
//!   <specular map | NO_TEXTURE>
//!   <normal map | NO_TEXTURE>
//!   R r g b            reflectivity
//!   [D r g b]          diffuse colour
//!   [S r g b]          specular colour
//!   [T technique]
//!   <separator>
//! <1 line ignored>
//! per vertex:
//!   P x y z / T x y z / N x y z / UV u v / <separator>
//! <1 line ignored>
//! per triangle:
//!   a b c subset
//! ```
//!
//! Z components of positions, tangents and normals are negated on import.
//! Triangles must be grouped by subset id; each contiguous run becomes one
//! subset, paired with materials in file order.

use crate::core::lines::{Line, LineReader};
use crate::core::types::{Result, Vec3, Vec4};
use crate::geometry::VertexPosTangNormTex;

/// Texture-name sentinel meaning "material colours only"
pub const NO_TEXTURE: &str = "NO_TEXTURE";

/// Technique used when a material names none
pub const DEFAULT_TECHNIQUE: &str = "MeshTech";

/// Material block as written in the file
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDesc {
    pub diffuse_map: Option<String>,
    pub specular_map: Option<String>,
    pub normal_map: Option<String>,
    /// False when the diffuse map is NO_TEXTURE
    pub use_textures: bool,
    pub reflectivity: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub technique: String,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            diffuse_map: None,
            specular_map: None,
            normal_map: None,
            use_textures: true,
            reflectivity: Vec4::ZERO,
            diffuse: Vec4::ZERO,
            specular: Vec4::ZERO,
            technique: DEFAULT_TECHNIQUE.to_string(),
        }
    }
}

/// Triangle row: three vertex indices and a subset id
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriangleRow {
    pub indices: [u32; 3],
    pub subset: u32,
    /// Source line, for diagnostics
    pub line: usize,
}

/// Parsed mesh file contents
#[derive(Clone, Debug, Default)]
pub struct MeshFile {
    pub materials: Vec<MaterialDesc>,
    pub vertices: Vec<VertexPosTangNormTex>,
    pub triangles: Vec<TriangleRow>,
}

/// Triangle-soup geometry for one subset
#[derive(Clone, Debug)]
pub struct SubsetGeometry {
    pub subset_id: u32,
    pub material_index: usize,
    pub vertices: Vec<VertexPosTangNormTex>,
}

fn flip_z(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, -v.z)
}

fn texture_name(line: &Line<'_>) -> Option<String> {
    let name = line.text.trim();
    (name != NO_TEXTURE && !name.is_empty()).then(|| name.to_string())
}

fn color3(line: &Line<'_>, what: &str) -> Result<Vec4> {
    Ok(line.vec3_at(1, what)?.extend(1.0))
}

fn parse_material(reader: &mut LineReader<'_>) -> Result<MaterialDesc> {
    let mut material = MaterialDesc::default();

    let line = reader.expect_line("diffuse map")?;
    material.diffuse_map = texture_name(&line);
    // Only a missing diffuse map switches the material to flat colours.
    material.use_textures = material.diffuse_map.is_some();
    let line = reader.expect_line("specular map")?;
    material.specular_map = texture_name(&line);
    let line = reader.expect_line("normal map")?;
    material.normal_map = texture_name(&line);

    let line = reader.expect_line("reflectivity")?;
    material.reflectivity = color3(&line, "reflectivity")?;

    if reader.peek_char() == Some('D') {
        let line = reader.expect_line("diffuse colour")?;
        material.diffuse = color3(&line, "diffuse colour")?;
    }
    if reader.peek_char() == Some('S') {
        let line = reader.expect_line("specular colour")?;
        material.specular = color3(&line, "specular colour")?;
    }
    if reader.peek_char() == Some('T') {
        let line = reader.expect_line("technique")?;
        material.technique = line.token(1, "technique name")?.to_string();
    }

    reader.skip(1, "material separator")?;
    Ok(material)
}

fn parse_vertex(reader: &mut LineReader<'_>) -> Result<VertexPosTangNormTex> {
    let position = reader.expect_line("vertex position")?.vec3_at(1, "vertex position")?;
    let tangent = reader.expect_line("vertex tangent")?.vec3_at(1, "vertex tangent")?;
    let normal = reader.expect_line("vertex normal")?.vec3_at(1, "vertex normal")?;
    let tex_coord = reader.expect_line("texture coordinate")?.vec2_at(1, "texture coordinate")?;
    reader.skip(1, "vertex separator")?;

    Ok(VertexPosTangNormTex {
        position: flip_z(position),
        tangent: flip_z(tangent),
        normal: flip_z(normal),
        tex_coord,
    })
}

/// Parse a mesh document. `source_name` appears in error messages.
pub fn parse_mesh(source_name: &str, text: &str) -> Result<MeshFile> {
    let mut reader = LineReader::new(source_name, text);

    reader.skip(1, "header")?;
    let material_count = reader.expect_line("material count")?.usize_at(1, "material count")?;
    let vertex_count = reader.expect_line("vertex count")?.usize_at(1, "vertex count")?;
    let triangle_count = reader.expect_line("triangle count")?.usize_at(1, "triangle count")?;
    reader.skip(2, "material section header")?;

    let mut file = MeshFile {
        materials: Vec::with_capacity(material_count),
        vertices: Vec::with_capacity(vertex_count),
        triangles: Vec::with_capacity(triangle_count),
    };

    for _ in 0..material_count {
        file.materials.push(parse_material(&mut reader)?);
    }

    reader.skip(1, "vertex section header")?;
    for _ in 0..vertex_count {
        file.vertices.push(parse_vertex(&mut reader)?);
    }

    reader.skip(1, "triangle section header")?;
    for _ in 0..triangle_count {
        let line = reader.expect_line("triangle")?;
        let mut indices = [0u32; 3];
        for (k, index) in indices.iter_mut().enumerate() {
            let value = line.usize_at(k, "triangle vertex index")?;
            if value >= vertex_count {
                return Err(line.error(format!(
                    "vertex index {} out of range ({} vertices)", value, vertex_count
                )));
            }
            *index = value as u32;
        }
        let subset = line.usize_at(3, "subset id")? as u32;
        file.triangles.push(TriangleRow { indices, subset, line: line.number });
    }

    Ok(file)
}

/// Split the triangle list into per-subset triangle soups.
///
/// Fails if a subset id reappears after a different id (the rows were not
/// grouped) or if there are more runs than materials.
pub fn carve_subsets(source_name: &str, file: &MeshFile) -> Result<Vec<SubsetGeometry>> {
    let mut subsets: Vec<SubsetGeometry> = Vec::new();

    for row in &file.triangles {
        let start_new = subsets.last().is_none_or(|s| s.subset_id != row.subset);
        if start_new {
            if subsets.iter().any(|s| s.subset_id == row.subset) {
                return Err(crate::core::Error::parse(
                    source_name,
                    row.line,
                    format!("subset {} is not contiguous; triangles must be grouped by subset", row.subset),
                ));
            }
            if subsets.len() == file.materials.len() {
                return Err(crate::core::Error::parse(
                    source_name,
                    row.line,
                    format!("more subsets than the {} declared materials", file.materials.len()),
                ));
            }
            subsets.push(SubsetGeometry {
                subset_id: row.subset,
                material_index: subsets.len(),
                vertices: Vec::new(),
            });
        }

        if let Some(subset) = subsets.last_mut() {
            subset
                .vertices
                .extend(row.indices.iter().map(|&i| file.vertices[i as usize]));
        }
    }

    if subsets.len() < file.materials.len() {
        log::warn!(
            "{}: {} materials declared but only {} subsets have triangles",
            source_name, file.materials.len(), subsets.len()
        );
    }

    Ok(subsets)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::Error;

    /// Two-material quad: one triangle per subset.
    pub(crate) const QUAD: &str = "\
mesh v1
x 2
x 4
x 2

materials
bark.png
NO_TEXTURE
bark_n.png
R 0.1 0.2 0.3
D 1 0.5 0.25
T BarkTech

leaf.png
leaf_s.png
leaf_n.png
R 0 0 0

vertices
P 0 0 0
T 1 0 0
N 0 0 1
UV 0 0

P 1 0 0
T 1 0 0
N 0 0 1
UV 1 0

P 0 1 0
T 1 0 0
N 0 0 1
UV 0 1

P 1 1 2
T 1 0 0
N 0 0 1
UV 1 1

triangles
0 1 2 0
2 1 3 1
";

    #[test]
    fn test_parse_materials() {
        let file = parse_mesh("quad.m3d", QUAD).unwrap();
        assert_eq!(file.materials.len(), 2);

        let bark = &file.materials[0];
        assert_eq!(bark.diffuse_map.as_deref(), Some("bark.png"));
        assert_eq!(bark.specular_map, None);
        assert_eq!(bark.normal_map.as_deref(), Some("bark_n.png"));
        assert!(bark.use_textures, "missing specular map must not disable textures");
        assert_eq!(bark.reflectivity, Vec4::new(0.1, 0.2, 0.3, 1.0));
        assert_eq!(bark.diffuse, Vec4::new(1.0, 0.5, 0.25, 1.0));
        assert_eq!(bark.specular, Vec4::ZERO);
        assert_eq!(bark.technique, "BarkTech");

        let leaf = &file.materials[1];
        assert!(leaf.use_textures);
        assert_eq!(leaf.technique, DEFAULT_TECHNIQUE);
    }

    #[test]
    fn test_missing_diffuse_map_disables_textures() {
        let text = QUAD.replace("materials\nbark.png\n", "materials\nNO_TEXTURE\n");
        let file = parse_mesh("flat.m3d", &text).unwrap();
        let bark = &file.materials[0];
        assert_eq!(bark.diffuse_map, None);
        assert!(!bark.use_textures);
        assert!(file.materials[1].use_textures);
    }

    #[test]
    fn test_parse_vertices_negate_z() {
        let file = parse_mesh("quad.m3d", QUAD).unwrap();
        assert_eq!(file.vertices.len(), 4);
        assert_eq!(file.vertices[3].position, Vec3::new(1.0, 1.0, -2.0));
        assert_eq!(file.vertices[0].normal, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(file.vertices[3].tex_coord, glam::Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_carve_subsets() {
        let file = parse_mesh("quad.m3d", QUAD).unwrap();
        let subsets = carve_subsets("quad.m3d", &file).unwrap();
        assert_eq!(subsets.len(), 2);
        assert_eq!(subsets[0].vertices.len(), 3);
        assert_eq!(subsets[1].material_index, 1);
        assert_eq!(subsets[1].vertices[2].position, Vec3::new(1.0, 1.0, -2.0));
    }

    #[test]
    fn test_non_contiguous_subsets_fail() {
        let text = QUAD.replace("x 2\n\nmaterials", "x 3\n\nmaterials")
            .replace("2 1 3 1\n", "2 1 3 1\n0 2 3 0\n");
        let file = parse_mesh("bad.m3d", &text).unwrap();
        match carve_subsets("bad.m3d", &file) {
            Err(Error::Parse { line, message, .. }) => {
                assert!(message.contains("not contiguous"), "{}", message);
                assert_eq!(line, file.triangles[2].line);
            }
            other => panic!("expected parse error, got {:?}", other.map(|s| s.len())),
        }
    }

    #[test]
    fn test_bad_vertex_index_reports_line() {
        let text = QUAD.replace("2 1 3 1", "2 1 9 1");
        let err = parse_mesh("bad.m3d", &text).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 42, .. }), "{:?}", err);
    }

    #[test]
    fn test_truncated_file_fails() {
        let truncated: String = QUAD.lines().take(20).collect::<Vec<_>>().join("\n");
        assert!(matches!(parse_mesh("short.m3d", &truncated), Err(Error::Parse { .. })));
    }
}
