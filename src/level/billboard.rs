//! Camera-facing textured quads

use crate::core::types::{Vec2, Vec3};
use crate::level::assets::AssetHandle;
use crate::math::Aabb;

/// A billboard quad. `size` holds the half extents.
#[derive(Clone, Debug, PartialEq)]
pub struct Billboard {
    position: Vec3,
    size: Vec2,
    pub texture: Option<AssetHandle>,
    /// Hidden billboards are skipped by culling and snapshots
    pub visible: bool,
    aabb: Aabb,
}

impl Billboard {
    pub fn new(position: Vec3, size: Vec2, texture: Option<AssetHandle>) -> Self {
        Self {
            position,
            size,
            texture,
            visible: true,
            aabb: Self::bounds(position, size),
        }
    }

    fn bounds(position: Vec3, size: Vec2) -> Aabb {
        Aabb::from_center_half_extent(position, Vec3::new(size.x, size.y, size.x))
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[inline]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.aabb = Self::bounds(self.position, self.size);
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
        self.aabb = Self::bounds(self.position, self.size);
    }
}
