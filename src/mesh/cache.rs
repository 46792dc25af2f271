//! Mesh template cache
//!
//! Each mesh file is parsed once. Later requests for the same name return a
//! fresh [`Mesh`] that shares the template's vertex data and materials but
//! owns its transform and world-space boxes.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::core::types::Result;
use crate::level::assets::AssetLoader;

use super::format::{carve_subsets, parse_mesh};
use super::instance::{Material, Mesh, MeshTemplate};

/// Cache of parsed mesh templates keyed by file name
#[derive(Debug, Default)]
pub struct MeshCache {
    /// Directory mesh names are resolved against
    directory: PathBuf,
    templates: HashMap<String, Arc<MeshTemplate>>,
}

impl MeshCache {
    /// Create an empty cache reading from `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            templates: HashMap::new(),
        }
    }

    /// Instance of mesh `name`, parsing the file on first request
    pub fn load(&mut self, name: &str, assets: &mut dyn AssetLoader) -> Result<Mesh> {
        let template = self.template(name, assets)?;
        Ok(Mesh::new(template))
    }

    /// Parse and cache `name` without creating an instance
    pub fn preload(&mut self, name: &str, assets: &mut dyn AssetLoader) -> Result<()> {
        self.template(name, assets).map(|_| ())
    }

    /// Shared template for `name`, parsing the file on first request
    pub fn template(&mut self, name: &str, assets: &mut dyn AssetLoader) -> Result<Arc<MeshTemplate>> {
        if let Some(template) = self.templates.get(name) {
            return Ok(template.clone());
        }

        let path = self.directory.join(name);
        let text = std::fs::read_to_string(&path)?;
        let file = parse_mesh(name, &text)?;
        let geometry = carve_subsets(name, &file)?;
        let materials = file
            .materials
            .iter()
            .map(|m| Material::resolve(m, assets))
            .collect::<Result<Vec<_>>>()?;

        let template = Arc::new(MeshTemplate::new(name, geometry, &materials));
        log::debug!(
            "Loaded mesh {} ({} subsets, {} vertices)",
            name,
            template.subsets.len(),
            template.vertex_count()
        );

        self.templates.insert(name.to_string(), template.clone());
        Ok(template)
    }

    /// Register an already-built template under `name`
    pub fn insert(&mut self, name: impl Into<String>, template: MeshTemplate) {
        self.templates.insert(name.into(), Arc::new(template));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Number of cached templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Drop every cached template
    pub fn clear(&mut self) {
        self.templates.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;
    use crate::core::Error;
    use crate::level::assets::MemoryAssets;
    use crate::mesh::format::tests::QUAD;

    fn cache_with_quad() -> (tempfile::TempDir, MeshCache) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("quad.m3d"), QUAD).unwrap();
        let cache = MeshCache::new(dir.path());
        (dir, cache)
    }

    #[test]
    fn test_second_load_shares_vertices() {
        let (_dir, mut cache) = cache_with_quad();
        let mut assets = MemoryAssets::new();

        let a = cache.load("quad.m3d", &mut assets).unwrap();
        let b = cache.load("quad.m3d", &mut assets).unwrap();
        assert_eq!(cache.len(), 1);
        assert!(Arc::ptr_eq(a.template(), b.template()));
        assert_eq!(a.template().subsets[0].vertices, b.template().subsets[0].vertices);
    }

    #[test]
    fn test_instances_move_independently() {
        let (_dir, mut cache) = cache_with_quad();
        let mut assets = MemoryAssets::new();

        let mut a = cache.load("quad.m3d", &mut assets).unwrap();
        let b = cache.load("quad.m3d", &mut assets).unwrap();
        let before = *b.aabb();

        a.set_position(Vec3::new(500.0, 0.0, 0.0));
        assert_eq!(*b.aabb(), before);
        assert_ne!(*a.aabb(), before);

        // a fresh copy starts at the identity transform
        let c = cache.load("quad.m3d", &mut assets).unwrap();
        assert_eq!(c.position(), Vec3::ZERO);
        assert_eq!(*c.aabb(), before);
    }

    #[test]
    fn test_materials_resolve_through_loader() {
        let (_dir, mut cache) = cache_with_quad();
        let mut assets = MemoryAssets::new();
        cache.preload("quad.m3d", &mut assets).unwrap();
        // bark.png, bark_n.png, leaf.png, leaf_s.png, leaf_n.png
        assert_eq!(assets.len(), 5);
        assert!(cache.contains("quad.m3d"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let (_dir, mut cache) = cache_with_quad();
        let mut assets = MemoryAssets::new();
        let err = cache.load("nope.m3d", &mut assets).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!cache.contains("nope.m3d"));
    }

    #[test]
    fn test_clear() {
        let (_dir, mut cache) = cache_with_quad();
        let mut assets = MemoryAssets::new();
        cache.preload("quad.m3d", &mut assets).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
