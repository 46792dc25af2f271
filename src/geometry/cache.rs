//! Memoized sphere geometry owned by a scene

use std::collections::HashMap;
use std::sync::Arc;

use super::icosphere::{build_icosphere, IcosphereMesh};

/// Consumer class of a sphere. Classes differ in seed orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SphereClass {
    /// Collectible orbs, seen from outside
    Orb,
    /// Sky dome, seen from inside
    SkyDome,
}

impl SphereClass {
    fn mirrored(self) -> bool {
        matches!(self, SphereClass::SkyDome)
    }
}

/// Geometry cache keyed by (class, radius).
///
/// Each distinct key is generated once; callers share the result through an
/// `Arc`.
#[derive(Debug, Default)]
pub struct GeometryCache {
    spheres: HashMap<(SphereClass, u32), Arc<IcosphereMesh>>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sphere for `class` at `radius`, generated on first request
    pub fn sphere(&mut self, class: SphereClass, radius: f32) -> Arc<IcosphereMesh> {
        let key = (class, radius.to_bits());
        self.spheres
            .entry(key)
            .or_insert_with(|| {
                log::debug!("Generating {:?} sphere, radius {}", class, radius);
                Arc::new(build_icosphere(radius, class.mirrored()))
            })
            .clone()
    }

    /// Number of cached spheres
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_is_shared() {
        let mut cache = GeometryCache::new();
        let a = cache.sphere(SphereClass::Orb, 3.0);
        let b = cache.sphere(SphereClass::Orb, 3.0);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_keys_are_separate() {
        let mut cache = GeometryCache::new();
        let orb = cache.sphere(SphereClass::Orb, 3.0);
        let sky = cache.sphere(SphereClass::SkyDome, 8000.0);
        let big_orb = cache.sphere(SphereClass::Orb, 6.0);
        assert!(!Arc::ptr_eq(&orb, &sky));
        assert!(!Arc::ptr_eq(&orb, &big_orb));
        assert_eq!(cache.len(), 3);
        assert_eq!(sky.triangle_count(), 1280);
    }

    #[test]
    fn test_caches_are_independent() {
        let mut a = GeometryCache::new();
        let b = GeometryCache::new();
        a.sphere(SphereClass::Orb, 3.0);
        assert!(b.is_empty());
    }
}
