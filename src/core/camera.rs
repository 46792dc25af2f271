//! Viewer camera consumed by the simulation each tick

use crate::core::types::{Vec2, Vec3, Mat4};
use crate::math::{Aabb, Frustum};

/// First-person viewer state supplied by the host every tick.
///
/// The simulation never moves the camera; it reads the pose to place rain,
/// recycle grass, aim the sun and test orb pickups.
#[derive(Clone, Debug)]
pub struct Camera {
    /// World position of the eye
    pub position: Vec3,
    /// Look direction (unit length)
    pub look: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    /// Width over height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Collision box size: x is the horizontal half extent, y the height
    /// below the eye. The box reaches y/2 above the eye.
    pub aabb_size: Vec2,
}

impl Camera {
    /// Create a camera at `position` looking along `look`
    pub fn new(position: Vec3, look: Vec3) -> Self {
        Self {
            position,
            look: look.try_normalize().unwrap_or(Vec3::NEG_Z),
            up: Vec3::Y,
            fov_y: 45.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 10000.0,
            aabb_size: Vec2::new(1.0, 8.0),
        }
    }

    /// Camera at `position` facing `target`
    pub fn look_at(position: Vec3, target: Vec3) -> Self {
        Self::new(position, target - position)
    }

    /// World-to-eye transform. Looking straight up or down swaps the up
    /// vector for Z.
    pub fn view_matrix(&self) -> Mat4 {
        let up = if self.look.cross(self.up).length_squared() < 1e-8 {
            Vec3::Z
        } else {
            self.up
        };
        Mat4::look_to_rh(self.position, self.look, up)
    }

    /// Perspective projection with a 0..1 depth range
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// View frustum in world space
    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(&self.view_projection())
    }

    /// Collision box around the eye
    pub fn aabb(&self) -> Aabb {
        let p = self.position;
        let s = self.aabb_size;
        Aabb::new(
            Vec3::new(p.x - s.x, p.y - s.y, p.z - s.x),
            Vec3::new(p.x + s.x, p.y + s.y * 0.5, p.z + s.x),
        )
    }

    /// Depth of the eye below a water plane at `water_height` (0 when above)
    pub fn depth_below(&self, water_height: f32) -> f32 {
        (water_height - self.position.y).max(0.0)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Z)
    }
}
