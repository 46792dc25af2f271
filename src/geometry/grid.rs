//! Rectangular grids for terrain, water and flat surfaces.
//!
//! Vertices are laid out row-major and centered on the origin: row `i` runs
//! along +Z, column `j` along +X. Each 2x2 cell becomes two triangles split
//! along the B-C diagonal:
//!
//! ```text
//!   A (i, j) ---- B (i, j+1)
//!     |        /   |
//!     |     /      |
//!   C (i+1, j) -- D (i+1, j+1)
//! ```
//!
//! Height queries in [`crate::terrain`] rely on this exact split.

use crate::core::types::{Vec2, Vec3};
use super::vertex::VertexPosNormTex;

/// Grid dimensions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    pub rows: usize,
    pub cols: usize,
    pub spacing: f32,
    pub texture_scale: f32,
}

impl GridSpec {
    pub fn new(rows: usize, cols: usize, spacing: f32, texture_scale: f32) -> Self {
        Self { rows, cols, spacing, texture_scale }
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Half of the grid's extent along X
    pub fn half_width(&self) -> f32 {
        (self.cols.saturating_sub(1)) as f32 * self.spacing * 0.5
    }

    /// Half of the grid's extent along Z
    pub fn half_depth(&self) -> f32 {
        (self.rows.saturating_sub(1)) as f32 * self.spacing * 0.5
    }

    /// World XZ position of sample (row, col)
    pub fn sample_xz(&self, row: usize, col: usize) -> Vec2 {
        Vec2::new(
            -self.half_width() + col as f32 * self.spacing,
            row as f32 * self.spacing - self.half_depth(),
        )
    }

    fn tex_coord(&self, row: usize, col: usize) -> Vec2 {
        let u = if self.cols > 1 { col as f32 / (self.cols - 1) as f32 } else { 0.0 };
        let v = if self.rows > 1 { row as f32 / (self.rows - 1) as f32 } else { 0.0 };
        Vec2::new(u, v) * self.texture_scale
    }
}

/// Grid vertex and index buffers
#[derive(Clone, Debug, Default)]
pub struct GridMesh {
    pub vertices: Vec<VertexPosNormTex>,
    pub indices: Vec<u32>,
}

impl GridMesh {
    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Two triangles per cell: (A, B, C) then (C, B, D).
pub fn grid_indices(rows: usize, cols: usize) -> Vec<u32> {
    if rows < 2 || cols < 2 {
        return Vec::new();
    }
    let mut indices = Vec::with_capacity((rows - 1) * (cols - 1) * 6);
    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            let a = (i * cols + j) as u32;
            let b = a + 1;
            let c = ((i + 1) * cols + j) as u32;
            let d = c + 1;
            indices.extend_from_slice(&[a, b, c, c, b, d]);
        }
    }
    indices
}

/// Per-vertex normals by summing each face normal into its three vertices,
/// then normalizing the sums.
///
/// Every face counts once per vertex regardless of its area.
pub fn accumulate_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let e0 = positions[i1] - positions[i0];
        let e1 = positions[i2] - positions[i0];
        let face = e1.cross(e0).normalize_or_zero();
        normals[i0] += face;
        normals[i1] += face;
        normals[i2] += face;
    }
    for n in &mut normals {
        *n = n.normalize_or_zero();
    }
    normals
}

/// Grid whose sample heights come from `heights` (row-major, `rows * cols`
/// long), with accumulated vertex normals.
pub fn build_grid(spec: &GridSpec, heights: &[f32]) -> GridMesh {
    debug_assert_eq!(heights.len(), spec.vertex_count());

    let mut positions = Vec::with_capacity(spec.vertex_count());
    for i in 0..spec.rows {
        for j in 0..spec.cols {
            let xz = spec.sample_xz(i, j);
            positions.push(Vec3::new(xz.x, heights[i * spec.cols + j], xz.y));
        }
    }

    let indices = grid_indices(spec.rows, spec.cols);
    let normals = accumulate_normals(&positions, &indices);

    let mut vertices = Vec::with_capacity(positions.len());
    for i in 0..spec.rows {
        for j in 0..spec.cols {
            let k = i * spec.cols + j;
            vertices.push(VertexPosNormTex {
                position: positions[k],
                normal: normals[k],
                tex_coord: spec.tex_coord(i, j),
            });
        }
    }

    GridMesh { vertices, indices }
}

/// Flat grid at constant `height` with every normal pointing up.
pub fn build_flat_grid(spec: &GridSpec, height: f32) -> GridMesh {
    let mut vertices = Vec::with_capacity(spec.vertex_count());
    for i in 0..spec.rows {
        for j in 0..spec.cols {
            let xz = spec.sample_xz(i, j);
            vertices.push(VertexPosNormTex {
                position: Vec3::new(xz.x, height, xz.y),
                normal: Vec3::Y,
                tex_coord: spec.tex_coord(i, j),
            });
        }
    }

    GridMesh {
        vertices,
        indices: grid_indices(spec.rows, spec.cols),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_centered_row_major() {
        let spec = GridSpec::new(3, 3, 1000.0, 1.0);
        let mesh = build_flat_grid(&spec, 0.0);
        assert_eq!(mesh.vertices.len(), 9);
        assert_eq!(mesh.vertices[0].position, Vec3::new(-1000.0, 0.0, -1000.0));
        assert_eq!(mesh.vertices[1].position, Vec3::new(0.0, 0.0, -1000.0));
        assert_eq!(mesh.vertices[3].position, Vec3::new(-1000.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[8].position, Vec3::new(1000.0, 0.0, 1000.0));
    }

    #[test]
    fn test_index_count_and_split() {
        let indices = grid_indices(3, 4);
        assert_eq!(indices.len(), 2 * 3 * 6);
        // first cell: A=0, B=1, C=4, D=5
        assert_eq!(&indices[..6], &[0, 1, 4, 4, 1, 5]);
    }

    #[test]
    fn test_tex_coords_scale() {
        let spec = GridSpec::new(5, 5, 10.0, 4.0);
        let mesh = build_flat_grid(&spec, 0.0);
        assert_eq!(mesh.vertices[0].tex_coord, Vec2::ZERO);
        assert_eq!(mesh.vertices[24].tex_coord, Vec2::new(4.0, 4.0));
        assert_eq!(mesh.vertices[2].tex_coord, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_flat_heights_give_up_normals() {
        let spec = GridSpec::new(4, 4, 2.0, 1.0);
        let mesh = build_grid(&spec, &[5.0; 16]);
        for v in &mesh.vertices {
            assert!((v.normal - Vec3::Y).length() < 1e-5, "normal {:?}", v.normal);
        }
    }

    #[test]
    fn test_peak_normals_lean_outward() {
        let spec = GridSpec::new(3, 3, 1.0, 1.0);
        let heights = [0.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 0.0];
        let mesh = build_grid(&spec, &heights);
        // west edge-middle vertex faces away from the peak
        let west = mesh.vertices[3].normal;
        assert!(west.x < 0.0 && west.y > 0.0, "west normal {:?}", west);
        for v in &mesh.vertices {
            assert!((v.normal.length() - 1.0).abs() < 1e-5);
        }
    }
}
