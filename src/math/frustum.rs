//! View frustum tests for grass recycling and draw culling

use crate::core::types::{Mat4, Vec3, Vec4};
use super::aabb::Aabb;

/// Plane `normal . p + offset = 0`; the positive side faces into the frustum
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: f32,
}

impl Plane {
    pub fn new(normal: Vec3, offset: f32) -> Self {
        Self { normal, offset }
    }

    /// Plane from clip-space coefficients, rescaled to a unit normal
    fn from_coefficients(c: Vec4) -> Self {
        let inv = c.truncate().length_recip();
        Self::new(c.truncate() * inv, c.w * inv)
    }

    /// Signed distance, positive on the inner side
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.offset
    }

    /// Box corner furthest along the normal
    #[inline]
    fn support(&self, aabb: &Aabb) -> Vec3 {
        Vec3::select(self.normal.cmpge(Vec3::ZERO), aabb.max, aabb.min)
    }
}

/// Near, far, left, right, bottom and top planes of a camera
#[derive(Clone, Copy, Debug)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Planes of a right-handed view-projection with a 0..1 depth range
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let (r0, r1, r2, r3) = (vp.row(0), vp.row(1), vp.row(2), vp.row(3));
        let planes = [r2, r3 - r2, r3 + r0, r3 - r0, r3 + r1, r3 - r1].map(Plane::from_coefficients);
        Self { planes }
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|p| p.signed_distance(point) >= 0.0)
    }

    /// Conservative box test: false only when the box lies wholly outside
    /// one plane
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.planes
            .iter()
            .all(|p| p.signed_distance(p.support(aabb)) >= 0.0)
    }

    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes.iter().all(|p| p.signed_distance(center) >= -radius)
    }
}
