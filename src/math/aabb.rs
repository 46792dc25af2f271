//! Axis-aligned bounding box

use crate::core::types::{Mat4, Vec3};

/// Axis-aligned bounding box defined by min and max corners
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of half size `half_extent` around `center`
    pub fn from_center_half_extent(center: Vec3, half_extent: Vec3) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Smallest box containing every point, or `None` for an empty set
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Aabb::new(first, first);
        for p in iter {
            aabb.expand(p);
        }
        Some(aabb)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// The eight corners, bit 0 selecting x, bit 1 y, bit 2 z
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 != 0 { self.max.x } else { self.min.x },
                if i & 2 != 0 { self.max.y } else { self.min.y },
                if i & 4 != 0 { self.max.z } else { self.min.z },
            )
        })
    }

    /// Box enclosing this box after transformation by `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        let corners = self.corners().map(|c| matrix.transform_point3(c));
        let mut aabb = Aabb::new(corners[0], corners[0]);
        for c in &corners[1..] {
            aabb.expand(*c);
        }
        aabb
    }

    /// Whether `p` lies inside or on the boundary
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Whether the boxes overlap; touching faces count
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Check if a sphere touches the box
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        closest.distance_squared(center) <= radius * radius
    }

    /// Grow to include `point`
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Smallest box holding both
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_half_extent() {
        let aabb = Aabb::from_center_half_extent(Vec3::new(4.0, 0.0, -2.0), Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(aabb.center(), Vec3::new(4.0, 0.0, -2.0));
        assert_eq!(aabb.size(), Vec3::new(2.0, 4.0, 2.0));
        assert!(aabb.contains_point(Vec3::new(5.0, -2.0, -1.0)));
        assert!(!aabb.contains_point(Vec3::new(5.1, 0.0, -2.0)));
    }

    #[test]
    fn test_overlap_and_touching() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let touching = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let apart = Aabb::new(Vec3::new(0.0, 1.5, 0.0), Vec3::new(1.0, 2.0, 1.0));
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
        assert_eq!(a.merged(&apart).max, Vec3::new(1.0, 2.0, 1.0));
    }

    #[test]
    fn test_from_points_empty_and_filled() {
        assert!(Aabb::from_points(Vec::<Vec3>::new()).is_none());
        let aabb = Aabb::from_points([Vec3::new(1.0, -2.0, 3.0), Vec3::new(-1.0, 4.0, 0.0)]).unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 4.0, 3.0));
    }

    #[test]
    fn test_transformed_by_rotation_and_translation() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -2.0), Vec3::new(1.0, 1.0, 2.0));
        let m = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0))
            * Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let t = aabb.transformed(&m);
        // z extent of 2 swings onto the x axis
        assert!((t.min.x - 8.0).abs() < 1e-4, "min.x = {}", t.min.x);
        assert!((t.max.x - 12.0).abs() < 1e-4, "max.x = {}", t.max.x);
        assert!((t.max.z - 1.0).abs() < 1e-4, "max.z = {}", t.max.z);
    }

    #[test]
    fn test_intersects_sphere() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.intersects_sphere(Vec3::new(2.0, 0.5, 0.5), 1.0));
        assert!(!aabb.intersects_sphere(Vec3::new(3.0, 0.5, 0.5), 1.0));
    }
}
