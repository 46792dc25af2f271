//! Grass billboards recycled around the camera.
//!
//! A fixed set of blades follows the viewer. A blade that leaves the view
//! frustum or the grass radius is dropped at a random point near the camera
//! with zero size, then grows in as the camera approaches it and shrinks as
//! the camera walks away. Every blade sits on the terrain; blades that land
//! under water are hidden.

pub mod config;

pub use config::GrassConfig;

use crate::core::random::{centered, unit, SimRng};
use crate::core::types::{Vec2, Vec3};
use crate::core::Camera;
use crate::level::Billboard;
use crate::terrain::TerrainHeightField;

/// One recycled grass billboard
#[derive(Clone, Debug)]
pub struct GrassBlade {
    pub billboard: Billboard,
    /// Largest size this blade grows to
    pub max_size: Vec2,
    /// Camera distance recorded on the previous update
    pub distance: f32,
}

/// Fixed pool of grass blades
#[derive(Debug)]
pub struct GrassField {
    config: GrassConfig,
    blades: Vec<GrassBlade>,
    rng: SimRng,
}

impl GrassField {
    /// Build `config.count` blades from the level's grass billboard.
    ///
    /// Blades start collapsed at the origin, so the first update scatters
    /// them around the camera.
    pub fn new(config: GrassConfig, template: &Billboard, mut rng: SimRng) -> Self {
        let blades = (0..config.count)
            .map(|_| {
                let scale = unit(&mut rng).max(config.min_template_scale);
                GrassBlade {
                    billboard: Billboard::new(Vec3::ZERO, Vec2::ZERO, template.texture),
                    max_size: template.size() * scale,
                    distance: 0.0,
                }
            })
            .collect();
        Self { config, blades, rng }
    }

    #[inline]
    pub fn config(&self) -> &GrassConfig {
        &self.config
    }

    pub fn blades(&self) -> &[GrassBlade] {
        &self.blades
    }

    /// Blades above the water line
    pub fn visible(&self) -> impl Iterator<Item = &Billboard> {
        self.blades.iter().map(|b| &b.billboard).filter(|b| b.visible)
    }

    pub fn len(&self) -> usize {
        self.blades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blades.is_empty()
    }

    /// Recycle, resize and re-seat every blade for this frame's camera
    pub fn update(&mut self, camera: &Camera, terrain: &TerrainHeightField, water_height: f32) {
        let frustum = camera.frustum();
        let eye = camera.position;
        let radius = self.config.radius;

        for blade in &mut self.blades {
            let mut position = blade.billboard.position();
            let mut distance = position.distance(eye);
            let mut size = blade.billboard.size();

            if !frustum.intersects_aabb(blade.billboard.aabb()) || distance > radius {
                let offset = Vec3::new(
                    centered(&mut self.rng),
                    centered(&mut self.rng),
                    centered(&mut self.rng),
                );
                position = eye + offset * radius;
                distance = position.distance(eye);
                blade.distance = distance;
                size = Vec2::ZERO;
            }

            let grown = (size.x + (blade.distance - distance) * self.config.growth_rate)
                .clamp(0.0, blade.max_size.x);
            size = Vec2::splat(grown);
            blade.distance = distance;

            position.y = terrain.height(position.x, position.z);
            blade.billboard.visible = position.y >= water_height;
            if blade.billboard.visible {
                position.y += size.y;
            }
            blade.billboard.set_size(size);
            blade.billboard.set_position(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::rng;

    const GROUND: f32 = 5.0;

    fn terrain() -> TerrainHeightField {
        TerrainHeightField::flat(65, 65, 10.0, 1.0, GROUND).unwrap()
    }

    fn field(count: usize) -> GrassField {
        let template = Billboard::new(Vec3::ZERO, Vec2::new(2.0, 2.0), None);
        let config = GrassConfig { count, ..Default::default() };
        GrassField::new(config, &template, rng(Some(11)))
    }

    #[test]
    fn test_blade_sizes_scale_template() {
        let grass = field(50);
        assert_eq!(grass.len(), 50);
        for blade in grass.blades() {
            assert!(blade.max_size.x >= 1.0 && blade.max_size.x <= 2.0, "max = {:?}", blade.max_size);
            assert_eq!(blade.billboard.size(), Vec2::ZERO);
        }
    }

    #[test]
    fn test_first_update_scatters_around_camera() {
        let mut grass = field(100);
        let camera = Camera::new(Vec3::new(0.0, 20.0, 0.0), Vec3::NEG_Z);
        grass.update(&camera, &terrain(), -10000.0);

        for blade in grass.blades() {
            let p = blade.billboard.position();
            assert!(p.x.abs() <= 150.0 && p.z.abs() <= 150.0, "blade at {:?}", p);
            assert_eq!(blade.billboard.size(), Vec2::ZERO);
            assert!((p.y - GROUND).abs() < 1e-4, "y = {}", p.y);
            assert!(blade.billboard.visible);
        }
        assert_eq!(grass.visible().count(), 100);
    }

    #[test]
    fn test_blade_grows_as_camera_approaches() {
        let mut grass = field(1);
        let camera = Camera::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Z);
        {
            let blade = &mut grass.blades[0];
            blade.max_size = Vec2::splat(2.0);
            blade.billboard.set_position(Vec3::new(0.0, 5.0, -50.0));
            blade.billboard.set_size(Vec2::splat(0.5));
            blade.distance = 60.0;
        }
        grass.update(&camera, &terrain(), -10000.0);

        let blade = &grass.blades()[0];
        let d = Vec3::new(0.0, 5.0, -50.0).distance(camera.position);
        let expected = 0.5 + (60.0 - d) * 0.05;
        assert!((blade.billboard.size().x - expected).abs() < 1e-4, "size = {:?}", blade.billboard.size());
        assert!((blade.distance - d).abs() < 1e-4);
        assert!((blade.billboard.position().y - (GROUND + expected)).abs() < 1e-4);
    }

    #[test]
    fn test_growth_clamps_to_blade_size() {
        let mut grass = field(1);
        let camera = Camera::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Z);
        {
            let blade = &mut grass.blades[0];
            blade.max_size = Vec2::splat(2.0);
            blade.billboard.set_position(Vec3::new(0.0, 5.0, -50.0));
            blade.distance = 250.0;
        }
        grass.update(&camera, &terrain(), -10000.0);
        assert_eq!(grass.blades()[0].billboard.size(), Vec2::splat(2.0));

        // walking away shrinks it back down to zero
        grass.blades[0].distance = 0.0;
        grass.update(&camera, &terrain(), -10000.0);
        assert_eq!(grass.blades()[0].billboard.size(), Vec2::ZERO);
    }

    #[test]
    fn test_far_blade_respawns() {
        let mut grass = field(1);
        let camera = Camera::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Z);
        grass.blades[0].billboard.set_position(Vec3::new(0.0, 5.0, -290.0));
        grass.blades[0].billboard.set_size(Vec2::splat(1.0));
        let config = GrassConfig { radius: 100.0, ..grass.config().clone() };
        grass.config = config;

        grass.update(&camera, &terrain(), -10000.0);
        let p = grass.blades()[0].billboard.position();
        assert!(p.x.abs() <= 50.0 && p.z.abs() <= 50.0, "blade at {:?}", p);
        assert_eq!(grass.blades()[0].billboard.size(), Vec2::ZERO);
    }

    #[test]
    fn test_submerged_blades_hidden() {
        let mut grass = field(20);
        let camera = Camera::new(Vec3::new(0.0, 20.0, 0.0), Vec3::NEG_Z);
        grass.update(&camera, &terrain(), GROUND + 1.0);
        assert_eq!(grass.visible().count(), 0);
        assert!(grass.blades().iter().all(|b| !b.billboard.visible));
    }
}
