//! Content lookup: directory layout and opaque asset handles.
//!
//! Textures, sounds and music are never decoded here. A loader resolves a
//! name to a handle the renderer or audio backend understands; loading the
//! same (kind, name) twice yields the same handle.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::types::Result;
use crate::core::Error;

/// Category of an external asset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Texture,
    Sound,
    Music,
}

/// Opaque reference to a loaded asset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetHandle {
    pub kind: AssetKind,
    pub id: u32,
}

/// Directory layout under a content root
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentPaths {
    pub root: PathBuf,
    pub meshes: PathBuf,
    pub terrain: PathBuf,
    pub textures: PathBuf,
    pub sounds: PathBuf,
    pub music: PathBuf,
}

impl Default for ContentPaths {
    fn default() -> Self {
        Self {
            root: PathBuf::from("Content"),
            meshes: PathBuf::from("Meshes"),
            terrain: PathBuf::from("Terrain"),
            textures: PathBuf::from("Textures"),
            sounds: PathBuf::from("SoundEffects"),
            music: PathBuf::from("Music"),
        }
    }
}

impl ContentPaths {
    /// Layout with default sub-directories under `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn mesh_path(&self, name: &str) -> PathBuf {
        self.root.join(&self.meshes).join(name)
    }

    pub fn terrain_path(&self, name: &str) -> PathBuf {
        self.root.join(&self.terrain).join(name)
    }

    pub fn asset_path(&self, kind: AssetKind, name: &str) -> PathBuf {
        let dir = match kind {
            AssetKind::Texture => &self.textures,
            AssetKind::Sound => &self.sounds,
            AssetKind::Music => &self.music,
        };
        self.root.join(dir).join(name)
    }
}

/// Resolves asset names to handles
pub trait AssetLoader {
    /// Resolve `name`, failing with [`Error::MissingAsset`] if it cannot be found
    fn load(&mut self, kind: AssetKind, name: &str) -> Result<AssetHandle>;

    /// Name a handle was loaded from
    fn name(&self, handle: AssetHandle) -> Option<&str>;
}

#[derive(Default)]
struct AssetTable {
    ids: HashMap<(AssetKind, String), AssetHandle>,
    names: Vec<String>,
}

impl AssetTable {
    fn intern(&mut self, kind: AssetKind, name: &str) -> AssetHandle {
        if let Some(handle) = self.ids.get(&(kind, name.to_string())) {
            return *handle;
        }
        let handle = AssetHandle { kind, id: self.names.len() as u32 };
        self.names.push(name.to_string());
        self.ids.insert((kind, name.to_string()), handle);
        handle
    }

    fn name(&self, handle: AssetHandle) -> Option<&str> {
        self.names.get(handle.id as usize).map(String::as_str)
    }
}

/// Loader that accepts any name without touching the filesystem
#[derive(Default)]
pub struct MemoryAssets {
    table: AssetTable,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct assets handed out
    pub fn len(&self) -> usize {
        self.table.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.names.is_empty()
    }
}

impl AssetLoader for MemoryAssets {
    fn load(&mut self, kind: AssetKind, name: &str) -> Result<AssetHandle> {
        Ok(self.table.intern(kind, name))
    }

    fn name(&self, handle: AssetHandle) -> Option<&str> {
        self.table.name(handle)
    }
}

/// Loader that requires each asset to exist under the content root
pub struct DirectoryAssets {
    paths: ContentPaths,
    table: AssetTable,
}

impl DirectoryAssets {
    pub fn new(paths: ContentPaths) -> Self {
        Self {
            paths,
            table: AssetTable::default(),
        }
    }

    pub fn paths(&self) -> &ContentPaths {
        &self.paths
    }

    fn exists(path: &Path) -> bool {
        path.is_file()
    }
}

impl AssetLoader for DirectoryAssets {
    fn load(&mut self, kind: AssetKind, name: &str) -> Result<AssetHandle> {
        let path = self.paths.asset_path(kind, name);
        if !Self::exists(&path) {
            return Err(Error::MissingAsset(path.display().to_string()));
        }
        Ok(self.table.intern(kind, name))
    }

    fn name(&self, handle: AssetHandle) -> Option<&str> {
        self.table.name(handle)
    }
}
