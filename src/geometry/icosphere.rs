//! Icosphere generation by recursive 1-to-4 triangle subdivision.
//!
//! The output is a triangle soup: each pass copies the three corners of every
//! triangle alongside its three edge midpoints, so shared edges carry
//! duplicate vertices. Indices still address that soup so the result can be
//! drawn with an index buffer.

use crate::core::types::Vec3;
use super::vertex::VertexPosNorm;

/// Number of subdivision passes applied to the seed icosahedron.
pub const SUBDIVISION_PASSES: u32 = 3;

const X: f32 = 0.525731;
const Z: f32 = 0.850651;

const SEED_POSITIONS: [Vec3; 12] = [
    Vec3::new(-X, 0.0, -Z), Vec3::new(X, 0.0, -Z),
    Vec3::new(-X, 0.0, Z), Vec3::new(X, 0.0, Z),
    Vec3::new(0.0, Z, -X), Vec3::new(0.0, Z, X),
    Vec3::new(0.0, -Z, -X), Vec3::new(0.0, -Z, X),
    Vec3::new(Z, X, 0.0), Vec3::new(-Z, X, 0.0),
    Vec3::new(Z, -X, 0.0), Vec3::new(-Z, -X, 0.0),
];

const SEED_INDICES: [u32; 60] = [
    1, 4, 0, 4, 9, 0, 4, 5, 9, 8, 5, 4, 1, 8, 4,
    1, 10, 8, 10, 3, 8, 8, 3, 5, 3, 2, 5, 3, 7, 2,
    3, 10, 7, 10, 6, 7, 6, 11, 7, 6, 0, 11, 6, 1, 0,
    10, 1, 6, 11, 0, 9, 2, 11, 9, 5, 2, 9, 11, 2, 7,
];

/// Local triangle pattern over (v0, v1, v2, m01, m12, m02).
const SPLIT_PATTERN: [u32; 12] = [0, 3, 5, 3, 4, 5, 5, 4, 2, 3, 1, 4];

/// Sphere vertex and index buffers
#[derive(Clone, Debug, Default)]
pub struct IcosphereMesh {
    pub vertices: Vec<VertexPosNorm>,
    pub indices: Vec<u32>,
}

impl IcosphereMesh {
    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// The 12-vertex, 20-triangle seed.
///
/// With `mirrored` set the seed is reflected through the XY plane, which
/// reverses triangle winding. Sky domes use the mirrored seed so their faces
/// are front-facing from inside.
pub fn icosahedron(mirrored: bool) -> (Vec<Vec3>, Vec<u32>) {
    let positions = SEED_POSITIONS
        .iter()
        .map(|p| if mirrored { Vec3::new(p.x, p.y, -p.z) } else { *p })
        .collect();
    (positions, SEED_INDICES.to_vec())
}

/// One 1-to-4 subdivision pass.
///
/// Every triangle emits six fresh vertices and four triangles. Nothing is
/// deduplicated.
pub fn subdivide(positions: &[Vec3], indices: &[u32]) -> (Vec<Vec3>, Vec<u32>) {
    let tri_count = indices.len() / 3;
    let mut out_positions = Vec::with_capacity(tri_count * 6);
    let mut out_indices = Vec::with_capacity(tri_count * 12);

    for tri in indices.chunks_exact(3) {
        let v0 = positions[tri[0] as usize];
        let v1 = positions[tri[1] as usize];
        let v2 = positions[tri[2] as usize];

        let m0 = (v0 + v1) * 0.5;
        let m1 = (v1 + v2) * 0.5;
        let m2 = (v0 + v2) * 0.5;

        let base = out_positions.len() as u32;
        out_positions.extend_from_slice(&[v0, v1, v2, m0, m1, m2]);
        out_indices.extend(SPLIT_PATTERN.iter().map(|i| base + i));
    }

    (out_positions, out_indices)
}

/// Subdivide the seed `passes` times and project onto a sphere of `radius`.
pub fn build_icosphere_with_passes(radius: f32, passes: u32, mirrored: bool) -> IcosphereMesh {
    let (mut positions, mut indices) = icosahedron(mirrored);
    for _ in 0..passes {
        (positions, indices) = subdivide(&positions, &indices);
    }

    let vertices = positions
        .iter()
        .map(|p| {
            let normal = p.normalize();
            VertexPosNorm {
                position: normal * radius,
                normal,
            }
        })
        .collect();

    IcosphereMesh { vertices, indices }
}

/// Standard sphere with [`SUBDIVISION_PASSES`] passes.
pub fn build_icosphere(radius: f32, mirrored: bool) -> IcosphereMesh {
    build_icosphere_with_passes(radius, SUBDIVISION_PASSES, mirrored)
}
