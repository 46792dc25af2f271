//! Mesh templates and placed mesh instances

use std::sync::Arc;

use crate::core::types::{Mat4, Result, Vec3, Vec4};
use crate::geometry::VertexPosTangNormTex;
use crate::level::assets::{AssetHandle, AssetKind, AssetLoader};
use crate::math::{Aabb, Ray};

use super::format::{MaterialDesc, SubsetGeometry};

/// Subset material with textures resolved to handles
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub diffuse_map: Option<AssetHandle>,
    pub specular_map: Option<AssetHandle>,
    pub normal_map: Option<AssetHandle>,
    pub use_textures: bool,
    pub reflectivity: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub technique: String,
}

impl Material {
    /// Resolve the texture names of `desc` through `assets`
    pub fn resolve(desc: &MaterialDesc, assets: &mut dyn AssetLoader) -> Result<Self> {
        let mut load = |name: &Option<String>| -> Result<Option<AssetHandle>> {
            name.as_deref()
                .map(|n| assets.load(AssetKind::Texture, n))
                .transpose()
        };
        Ok(Self {
            diffuse_map: load(&desc.diffuse_map)?,
            specular_map: load(&desc.specular_map)?,
            normal_map: load(&desc.normal_map)?,
            use_textures: desc.use_textures,
            reflectivity: desc.reflectivity,
            diffuse: desc.diffuse,
            specular: desc.specular,
            technique: desc.technique.clone(),
        })
    }
}

/// Geometry and material of one subset, in model space
#[derive(Clone, Debug)]
pub struct SubsetTemplate {
    pub vertices: Vec<VertexPosTangNormTex>,
    pub material: Material,
    pub model_aabb: Aabb,
}

/// Shared, immutable data behind every instance of one mesh file
#[derive(Clone, Debug)]
pub struct MeshTemplate {
    pub name: String,
    pub subsets: Vec<SubsetTemplate>,
}

impl MeshTemplate {
    /// Assemble a template from carved subsets and their materials
    pub fn new(name: impl Into<String>, geometry: Vec<SubsetGeometry>, materials: &[Material]) -> Self {
        let subsets = geometry
            .into_iter()
            .filter_map(|g| {
                let model_aabb = Aabb::from_points(g.vertices.iter().map(|v| v.position))?;
                Some(SubsetTemplate {
                    material: materials.get(g.material_index).cloned()?,
                    vertices: g.vertices,
                    model_aabb,
                })
            })
            .collect();
        Self { name: name.into(), subsets }
    }

    /// Total triangle-soup vertex count
    pub fn vertex_count(&self) -> usize {
        self.subsets.iter().map(|s| s.vertices.len()).sum()
    }
}

/// A placed copy of a mesh template.
///
/// The world-space boxes are kept in sync with the transform: every setter
/// rebuilds the world matrix and re-boxes each subset.
#[derive(Clone, Debug)]
pub struct Mesh {
    template: Arc<MeshTemplate>,
    position: Vec3,
    rotation: Vec3,
    scale: f32,
    world: Mat4,
    subset_aabbs: Vec<Aabb>,
    aabb: Aabb,
}

impl Mesh {
    /// Instance with an identity transform
    pub fn new(template: Arc<MeshTemplate>) -> Self {
        let mut mesh = Self {
            template,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
            world: Mat4::IDENTITY,
            subset_aabbs: Vec::new(),
            aabb: Aabb::default(),
        };
        mesh.update_world_matrix();
        mesh
    }

    #[inline]
    pub fn template(&self) -> &Arc<MeshTemplate> {
        &self.template
    }

    /// File name the template was loaded from
    #[inline]
    pub fn file_name(&self) -> &str {
        &self.template.name
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Per-axis rotation angles in radians
    #[inline]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    /// World-space box of the whole mesh
    #[inline]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// World-space box of each subset
    #[inline]
    pub fn subset_aabbs(&self) -> &[Aabb] {
        &self.subset_aabbs
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_world_matrix();
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.update_world_matrix();
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.update_world_matrix();
    }

    /// Set the whole transform with a single rebuild
    pub fn set_transform(&mut self, position: Vec3, rotation: Vec3, scale: f32) {
        self.position = position;
        self.rotation = rotation;
        self.scale = scale;
        self.update_world_matrix();
    }

    // X rotation applies first, then Y, Z, scale and translation.
    fn update_world_matrix(&mut self) {
        self.world = Mat4::from_translation(self.position)
            * Mat4::from_scale(Vec3::splat(self.scale))
            * Mat4::from_rotation_z(self.rotation.z)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_rotation_x(self.rotation.x);

        self.subset_aabbs.clear();
        self.subset_aabbs.extend(
            self.template
                .subsets
                .iter()
                .map(|s| s.model_aabb.transformed(&self.world)),
        );

        self.aabb = match self.subset_aabbs.split_first() {
            Some((first, rest)) => rest.iter().fold(*first, |acc, b| acc.merged(b)),
            None => Aabb::new(self.position, self.position),
        };
    }

    /// Whether `other` touches any subset box
    pub fn intersects_aabb(&self, other: &Aabb) -> bool {
        self.aabb.intersects(other) && self.subset_aabbs.iter().any(|b| b.intersects(other))
    }

    /// Distance along `ray` to the first subset box it hits
    pub fn ray_hit(&self, ray: &Ray) -> Option<f32> {
        ray.hit_distance(&self.aabb)?;
        self.subset_aabbs.iter().find_map(|b| ray.hit_distance(b))
    }

    /// Distance from `point` to the mesh origin
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }
}

/// Order meshes nearest-first from `eye`
pub fn sort_by_distance(meshes: &mut [Mesh], eye: Vec3) {
    meshes.sort_by(|a, b| a.distance_to(eye).total_cmp(&b.distance_to(eye)));
}
