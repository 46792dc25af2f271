//! Rays for mesh picking

use crate::core::types::Vec3;
use super::aabb::Aabb;

/// Half-line from `origin` along `direction`
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Component-wise reciprocal of `direction`; infinite on zero axes
    inv_direction: Vec3,
}

impl Ray {
    /// Ray along `direction`, which is normalized here
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction.normalize_or_zero();
        Self {
            origin,
            direction,
            inv_direction: direction.recip(),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Entry and exit parameters through `aabb` (slab test). Entry is
    /// clamped to 0 when the origin is inside the box.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> Option<(f32, f32)> {
        let a = (aabb.min - self.origin) * self.inv_direction;
        let b = (aabb.max - self.origin) * self.inv_direction;
        let enter = a.min(b).max_element();
        let exit = a.max(b).min_element();

        (enter <= exit && exit >= 0.0).then(|| (enter.max(0.0), exit))
    }

    /// Distance along the ray to the first hit on `aabb`
    pub fn hit_distance(&self, aabb: &Aabb) -> Option<f32> {
        self.intersects_aabb(aabb).map(|(enter, _)| enter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::ZERO, Vec3::ONE)
    }

    #[test]
    fn test_direction_is_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
        assert_eq!(ray.direction, Vec3::NEG_Z);
        assert_eq!(ray.at(2.5), Vec3::new(0.0, 0.0, -2.5));
    }

    #[test]
    fn test_slab_entry_and_exit() {
        let ray = Ray::new(Vec3::new(0.25, 0.5, 3.0), Vec3::NEG_Z);
        let (enter, exit) = ray.intersects_aabb(&unit_box()).unwrap();
        assert!((enter - 2.0).abs() < 1e-5, "enter = {}", enter);
        assert!((exit - 3.0).abs() < 1e-5, "exit = {}", exit);
    }

    #[test]
    fn test_miss_and_behind() {
        let beside = Ray::new(Vec3::new(2.0, 0.5, 3.0), Vec3::NEG_Z);
        assert!(beside.hit_distance(&unit_box()).is_none());

        let away = Ray::new(Vec3::new(0.5, 0.5, 3.0), Vec3::Z);
        assert!(away.hit_distance(&unit_box()).is_none());
    }

    #[test]
    fn test_origin_inside_hits_at_zero() {
        let ray = Ray::new(Vec3::splat(0.5), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(ray.hit_distance(&unit_box()), Some(0.0));
    }
}
