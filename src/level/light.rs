//! Scene lights and their shadow-casting matrices

use serde::{Deserialize, Serialize};

use crate::core::types::{Mat4, Vec3, Vec4};
use crate::math::Aabb;

/// Half extent of the orthographic shadow volume
pub const SHADOW_HALF_EXTENT: f32 = 250.0;
/// Near plane of the shadow projection
pub const SHADOW_NEAR: f32 = 1.0;
/// Far plane of the shadow projection
pub const SHADOW_FAR: f32 = 500.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightType {
    #[default]
    Directional,
    Point,
    Spotlight,
}

impl LightType {
    /// Parse a level-file keyword. Unknown keywords yield `None`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "DIRECTIONAL" => Some(LightType::Directional),
            "POINT" => Some(LightType::Point),
            "SPOTLIGHT" => Some(LightType::Spotlight),
            _ => None,
        }
    }
}

/// A light source.
///
/// `size` is the visual flare size. A size of zero or less also disables
/// bloom and scattering for this light.
#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub kind: LightType,
    pub position: Vec3,
    /// Unit direction the light travels
    pub direction: Vec3,
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub size: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            kind: LightType::Directional,
            position: Vec3::ZERO,
            direction: Vec3::new(0.0, -1.0, 0.0),
            ambient: Vec4::new(0.3, 0.3, 0.3, 1.0),
            diffuse: Vec4::ONE,
            specular: Vec4::ONE,
            size: 0.0,
        }
    }
}

impl Light {
    /// Whether flare, bloom and scattering are on
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.size > 0.0
    }

    /// Flare box centered on the light
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_half_extent(self.position, Vec3::splat(self.size * 0.5))
    }

    /// View matrix looking from the light along its direction
    pub fn view_matrix(&self) -> Mat4 {
        let direction = self.direction.try_normalize().unwrap_or(Vec3::NEG_Y);
        let up = if direction.cross(Vec3::Y).length_squared() < 1e-8 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        Mat4::look_to_rh(self.position, direction, up)
    }

    /// Orthographic shadow projection
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(
            -SHADOW_HALF_EXTENT,
            SHADOW_HALF_EXTENT,
            -SHADOW_HALF_EXTENT,
            SHADOW_HALF_EXTENT,
            SHADOW_NEAR,
            SHADOW_FAR,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(LightType::from_keyword("POINT"), Some(LightType::Point));
        assert_eq!(LightType::from_keyword("SPOTLIGHT"), Some(LightType::Spotlight));
        assert_eq!(LightType::from_keyword("AREA"), None);
    }

    #[test]
    fn test_aabb_and_enabled() {
        let light = Light { position: Vec3::new(10.0, 20.0, 30.0), size: 4.0, ..Default::default() };
        assert!(light.is_enabled());
        let aabb = light.aabb();
        assert_eq!(aabb.min, Vec3::new(8.0, 18.0, 28.0));
        assert_eq!(aabb.max, Vec3::new(12.0, 22.0, 32.0));

        let off = Light { size: 0.0, ..Default::default() };
        assert!(!off.is_enabled());
    }

    #[test]
    fn test_shadow_view_handles_vertical_direction() {
        let light = Light { position: Vec3::new(0.0, 250.0, 0.0), ..Default::default() };
        let view = light.view_matrix();
        assert!(view.is_finite());

        // a point straight below the light lands in front of the shadow camera
        let p = view.transform_point3(Vec3::ZERO);
        assert!((p.z + 250.0).abs() < 1e-3, "p = {:?}", p);

        let clip = light.view_projection().project_point3(Vec3::ZERO);
        assert!(clip.z >= 0.0 && clip.z <= 1.0, "depth = {}", clip.z);
    }
}
