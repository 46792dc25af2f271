//! GPU-ready vertex layouts

use bytemuck::{Pod, Zeroable};

use crate::core::types::{Vec2, Vec3};

/// Position and normal (icospheres)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct VertexPosNorm {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Position, normal and texture coordinate (terrain, water, surfaces)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct VertexPosNormTex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
}

/// Position, tangent, normal and texture coordinate (file meshes)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct VertexPosTangNormTex {
    pub position: Vec3,
    pub tangent: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_sizes_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<VertexPosNorm>(), 24);
        assert_eq!(std::mem::size_of::<VertexPosNormTex>(), 32);
        assert_eq!(std::mem::size_of::<VertexPosTangNormTex>(), 44);
    }

    #[test]
    fn test_cast_to_bytes() {
        let verts = [VertexPosNormTex::default(); 4];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 4 * 32);
    }
}
