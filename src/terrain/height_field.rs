//! Terrain height field: samples, normals and spatial queries.
//!
//! Queries never fail. Points outside the sampled area report
//! [`BELOW_WORLD_HEIGHT`] for heights and "no slope" for incline tests, so
//! movement code can run unguarded at the world's edge.

use std::path::Path;

use crate::core::types::{Quat, Result, Vec3};
use crate::core::Error;
use crate::geometry::grid::{build_grid, GridMesh, GridSpec};

/// Height reported for points outside the sampled area. Also the base of
/// heightmap-derived elevations.
pub const BELOW_WORLD_HEIGHT: f32 = -10.0;

/// Dimensions of the flat skirt plane laid under heightmap terrain.
pub const SKIRT_GRID: usize = 3;
pub const SKIRT_SPACING: f32 = 10000.0;

/// Grid of height samples with per-sample normals.
#[derive(Clone, Debug)]
pub struct TerrainHeightField {
    spec: GridSpec,
    heights: Vec<f32>,
    normals: Vec<Vec3>,
    mesh: GridMesh,
}

impl TerrainHeightField {
    /// Build from a resolved row-major height array.
    pub fn from_heights(
        rows: usize,
        cols: usize,
        spacing: f32,
        texture_scale: f32,
        heights: Vec<f32>,
    ) -> Result<Self> {
        if rows < 2 || cols < 2 {
            return Err(Error::InvalidConfig(format!(
                "height field needs at least 2x2 samples, got {}x{}", rows, cols
            )));
        }
        if heights.len() != rows * cols {
            return Err(Error::InvalidConfig(format!(
                "height field {}x{} needs {} samples, got {}",
                rows, cols, rows * cols, heights.len()
            )));
        }
        if !(spacing > 0.0) {
            return Err(Error::InvalidConfig(format!("invalid grid spacing {}", spacing)));
        }

        let spec = GridSpec::new(rows, cols, spacing, texture_scale);
        let mesh = build_grid(&spec, &heights);
        let normals = mesh.vertices.iter().map(|v| v.normal).collect();

        Ok(Self { spec, heights, normals, mesh })
    }

    /// Flat `rows x cols` plane at `height`.
    pub fn flat(rows: usize, cols: usize, spacing: f32, texture_scale: f32, height: f32) -> Result<Self> {
        Self::from_heights(rows, cols, spacing, texture_scale, vec![height; rows * cols])
    }

    /// The wide plane laid one unit under the world floor so the horizon
    /// never shows a gap past the heightmap's edge.
    pub fn skirt(texture_scale: f32) -> Result<Self> {
        Self::flat(SKIRT_GRID, SKIRT_GRID, SKIRT_SPACING, texture_scale, BELOW_WORLD_HEIGHT - 1.0)
    }

    /// Square heightmap of raw 8-bit samples.
    ///
    /// The side length is the square root of the byte count. Each sample maps
    /// to `BELOW_WORLD_HEIGHT + byte * height_scale`, then the field is
    /// smoothed once.
    pub fn from_raw_heightmap(
        bytes: &[u8],
        spacing: f32,
        height_scale: f32,
        texture_scale: f32,
    ) -> Result<Self> {
        let side = (bytes.len() as f64).sqrt() as usize;
        if side * side != bytes.len() {
            return Err(Error::InvalidConfig(format!(
                "raw heightmap of {} bytes is not square", bytes.len()
            )));
        }
        Self::from_samples(side, side, bytes, spacing, height_scale, texture_scale)
    }

    /// Read a raw heightmap file.
    pub fn load_raw(path: &Path, spacing: f32, height_scale: f32, texture_scale: f32) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        log::debug!("Read {} heightmap bytes from {}", bytes.len(), path.display());
        Self::from_raw_heightmap(&bytes, spacing, height_scale, texture_scale)
    }

    /// Read a grayscale image heightmap. Image rows map to grid rows.
    pub fn load_image(path: &Path, spacing: f32, height_scale: f32, texture_scale: f32) -> Result<Self> {
        let image = image::open(path)?.to_luma8();
        let (width, height) = image.dimensions();
        Self::from_samples(
            height as usize,
            width as usize,
            image.as_raw(),
            spacing,
            height_scale,
            texture_scale,
        )
    }

    /// Load a heightmap, choosing the decoder from the file extension.
    pub fn load(path: &Path, spacing: f32, height_scale: f32, texture_scale: f32) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png") | Some("bmp") | Some("tga") | Some("jpg") | Some("jpeg") => {
                Self::load_image(path, spacing, height_scale, texture_scale)
            }
            _ => Self::load_raw(path, spacing, height_scale, texture_scale),
        }
    }

    fn from_samples(
        rows: usize,
        cols: usize,
        samples: &[u8],
        spacing: f32,
        height_scale: f32,
        texture_scale: f32,
    ) -> Result<Self> {
        let raw: Vec<f32> = samples
            .iter()
            .map(|&b| BELOW_WORLD_HEIGHT + b as f32 * height_scale)
            .collect();
        let heights = smooth(&raw, rows, cols);
        Self::from_heights(rows, cols, spacing, texture_scale, heights)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    pub fn rows(&self) -> usize {
        self.spec.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.spec.cols
    }

    #[inline]
    pub fn spacing(&self) -> f32 {
        self.spec.spacing
    }

    #[inline]
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    #[inline]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Render geometry for the field
    #[inline]
    pub fn mesh(&self) -> &GridMesh {
        &self.mesh
    }

    /// Stored height of sample (row, col)
    pub fn sample(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.spec.rows && col < self.spec.cols {
            Some(self.heights[row * self.spec.cols + col])
        } else {
            None
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Fractional (column, row) coordinates of world point (x, z)
    fn cell_coords(&self, x: f32, z: f32) -> (f32, f32) {
        let s = self.spec.spacing;
        let c = (x + 0.5 * (self.spec.cols - 1) as f32 * s) / s;
        let d = (z + 0.5 * (self.spec.rows - 1) as f32 * s) / s;
        (c, d)
    }

    #[inline]
    fn h(&self, row: usize, col: usize) -> f32 {
        self.heights[row * self.spec.cols + col]
    }

    /// Terrain height at (x, z), interpolated within the triangle containing
    /// the point. Returns [`BELOW_WORLD_HEIGHT`] outside the grid.
    pub fn height(&self, x: f32, z: f32) -> f32 {
        let (c, d) = self.cell_coords(x, z);
        if !c.is_finite() || !d.is_finite() {
            return BELOW_WORLD_HEIGHT;
        }

        let last_col = (self.spec.cols - 1) as f32;
        let last_row = (self.spec.rows - 1) as f32;

        // Points on the far edges belong to the last cell
        let col_f = if c == last_col { last_col - 1.0 } else { c.floor() };
        let row_f = if d == last_row { last_row - 1.0 } else { d.floor() };

        if col_f < 0.0 || row_f < 0.0 || col_f + 1.0 > last_col || row_f + 1.0 > last_row {
            return BELOW_WORLD_HEIGHT;
        }

        let (row, col) = (row_f as usize, col_f as usize);
        let s = c - col_f;
        let t = d - row_f;

        let a = self.h(row, col);
        let b = self.h(row, col + 1);
        let cc = self.h(row + 1, col);
        let dd = self.h(row + 1, col + 1);

        if s + t <= 1.0 {
            a + s * (b - a) + t * (cc - a)
        } else {
            dd + (1.0 - s) * (cc - dd) + (1.0 - t) * (b - dd)
        }
    }

    /// Corner normal of the triangle containing (x, z), or `None` on the
    /// outer ring of cells and beyond.
    fn surface_normal(&self, x: f32, z: f32) -> Option<Vec3> {
        let (c, d) = self.cell_coords(x, z);
        if !c.is_finite() || !d.is_finite() {
            return None;
        }

        let col_f = c.floor();
        let row_f = d.floor();
        if row_f <= 0.0
            || col_f <= 0.0
            || row_f >= (self.spec.rows - 1) as f32
            || col_f >= (self.spec.cols - 1) as f32
        {
            return None;
        }

        let (row, col) = (row_f as usize, col_f as usize);
        let s = c - col_f;
        let t = d - row_f;

        let index = if s + t <= 1.0 {
            row * self.spec.cols + col
        } else {
            (row + 1) * self.spec.cols + col + 1
        };
        Some(self.normals[index])
    }

    /// Whether the surface at (x, z) is steeper than `ratio` allows, i.e.
    /// the corner normal's Y component is below `ratio`.
    pub fn is_steep_incline(&self, x: f32, z: f32, ratio: f32) -> bool {
        self.surface_normal(x, z).is_some_and(|n| n.y < ratio)
    }

    /// Unit vector pointing downhill along the surface at (x, z), or zero
    /// where there is no slope data or the surface is level.
    pub fn slope_direction(&self, x: f32, z: f32) -> Vec3 {
        let Some(normal) = self.surface_normal(x, z) else {
            return Vec3::ZERO;
        };
        let Some(forward) = Vec3::new(normal.x, 0.0, normal.z).try_normalize() else {
            return Vec3::ZERO;
        };

        let right = forward.cross(Vec3::Y);
        let dir = Quat::from_axis_angle(right, -std::f32::consts::FRAC_PI_2) * normal;
        if dir.y > 0.0 { -dir } else { dir }
    }
}

/// One smoothing pass: each sample becomes the mean of itself and its
/// in-bounds neighbours at (row-1..=row, col-1..=col).
fn smooth(heights: &[f32], rows: usize, cols: usize) -> Vec<f32> {
    let mut out = vec![0.0; heights.len()];
    for i in 0..rows {
        for j in 0..cols {
            let mut sum = 0.0;
            let mut count = 0.0;
            for ii in i.saturating_sub(1)..=i {
                for jj in j.saturating_sub(1)..=j {
                    sum += heights[ii * cols + jj];
                    count += 1.0;
                }
            }
            out[i * cols + j] = sum / count;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak() -> TerrainHeightField {
        TerrainHeightField::from_heights(
            3, 3, 1000.0, 1.0,
            vec![0.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn test_peak_scenario() {
        let t = peak();
        assert_eq!(t.height(0.0, 0.0), 10.0);
        assert_eq!(t.height(-1000.0, -1000.0), 0.0);
        assert_eq!(t.height(1000.0, 1000.0), 0.0);
        assert_eq!(t.height(0.0, 1500.0), BELOW_WORLD_HEIGHT);
    }

    #[test]
    fn test_exact_samples_return_stored_height() {
        let heights: Vec<f32> = (0..20).map(|i| (i * 7 % 11) as f32 * 1.5).collect();
        let t = TerrainHeightField::from_heights(4, 5, 10.0, 1.0, heights.clone()).unwrap();
        for row in 0..3 {
            for col in 0..4 {
                let x = -20.0 + col as f32 * 10.0;
                let z = -15.0 + row as f32 * 10.0;
                assert_eq!(t.height(x, z), heights[row * 5 + col], "sample ({}, {})", row, col);
            }
        }
    }

    #[test]
    fn test_continuous_across_diagonal() {
        let t = TerrainHeightField::from_heights(
            2, 2, 1.0, 1.0,
            vec![1.0, 4.0, -2.0, 9.0],
        )
        .unwrap();
        // cell spans x, z in [-0.5, 0.5]
        let eps = 1e-4;
        for &s in &[0.1f32, 0.35, 0.6, 0.9] {
            let t_line = 1.0 - s;
            let above = t.height(s - 0.5, t_line - eps - 0.5);
            let below = t.height(s - 0.5, t_line + eps - 0.5);
            assert!((above - below).abs() < 0.01, "s={} above={} below={}", s, above, below);
        }
    }

    #[test]
    fn test_flat_field_is_constant_inside_and_sentinel_outside() {
        let t = TerrainHeightField::flat(4, 5, 10.0, 1.0, 7.5).unwrap();
        for &x in &[-20.0f32, -13.3, 0.0, 4.9, 19.99, 20.0] {
            for &z in &[-15.0f32, -2.5, 0.0, 11.1, 15.0] {
                assert_eq!(t.height(x, z), 7.5, "at ({}, {})", x, z);
            }
        }
        assert_eq!(t.height(-20.5, 0.0), BELOW_WORLD_HEIGHT);
        assert_eq!(t.height(0.0, 15.5), BELOW_WORLD_HEIGHT);
        assert_eq!(t.height(f32::NAN, 0.0), BELOW_WORLD_HEIGHT);
    }

    #[test]
    fn test_rejects_mismatched_samples() {
        assert!(TerrainHeightField::from_heights(3, 3, 1.0, 1.0, vec![0.0; 8]).is_err());
        assert!(TerrainHeightField::from_heights(1, 3, 1.0, 1.0, vec![0.0; 3]).is_err());
        assert!(TerrainHeightField::from_heights(2, 2, 0.0, 1.0, vec![0.0; 4]).is_err());
    }

    fn ramp() -> TerrainHeightField {
        // descends one unit per unit of +x
        let heights = (0..25).map(|i| -((i % 5) as f32)).collect();
        TerrainHeightField::from_heights(5, 5, 1.0, 1.0, heights).unwrap()
    }

    #[test]
    fn test_slope_direction_points_downhill() {
        let t = ramp();
        let dir = t.slope_direction(0.2, 0.1);
        assert!(dir.x > 0.5, "dir {:?}", dir);
        assert!(dir.y < -0.5, "dir {:?}", dir);
        assert!(dir.z.abs() < 1e-4, "dir {:?}", dir);
        assert!((dir.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_steep_incline() {
        let t = ramp();
        assert!(t.is_steep_incline(0.2, 0.1, 0.8));
        assert!(!t.is_steep_incline(0.2, 0.1, 0.5));

        let flat = TerrainHeightField::flat(5, 5, 1.0, 1.0, 0.0).unwrap();
        assert!(!flat.is_steep_incline(0.2, 0.1, 0.99));
        assert_eq!(flat.slope_direction(0.2, 0.1), Vec3::ZERO);
    }

    #[test]
    fn test_edges_have_no_slope_data() {
        let t = ramp();
        // first column and last sample column
        assert!(!t.is_steep_incline(-1.9, 0.0, 0.99));
        assert_eq!(t.slope_direction(2.0, 0.0), Vec3::ZERO);
        assert_eq!(t.slope_direction(50.0, 50.0), Vec3::ZERO);
        // heights are still answered there
        assert!((t.height(-1.5, 0.0) - (-0.5)).abs() < 1e-5);
    }

    #[test]
    fn test_raw_heightmap_smoothing() {
        let mut bytes = [0u8; 9];
        bytes[4] = 10;
        let t = TerrainHeightField::from_raw_heightmap(&bytes, 1.0, 1.0, 1.0).unwrap();
        assert_eq!(t.rows(), 3);
        assert_eq!(t.sample(0, 0), Some(-10.0));
        assert_eq!(t.sample(1, 1), Some(-7.5));
        assert_eq!(t.sample(2, 2), Some(-7.5));
        assert_eq!(t.sample(0, 2), Some(-10.0));
    }

    #[test]
    fn test_raw_heightmap_must_be_square() {
        let err = TerrainHeightField::from_raw_heightmap(&[0u8; 10], 1.0, 1.0, 1.0);
        assert!(matches!(err, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_load_raw_and_image() {
        let dir = tempfile::tempdir().unwrap();

        let raw_path = dir.path().join("flat.raw");
        std::fs::write(&raw_path, [20u8; 16]).unwrap();
        let raw = TerrainHeightField::load(&raw_path, 2.0, 0.5, 1.0).unwrap();
        assert_eq!(raw.rows(), 4);
        assert_eq!(raw.height(0.0, 0.0), 0.0);

        let png_path = dir.path().join("flat.png");
        image::GrayImage::from_pixel(6, 3, image::Luma([40u8]))
            .save(&png_path)
            .unwrap();
        let img = TerrainHeightField::load(&png_path, 2.0, 0.25, 1.0).unwrap();
        assert_eq!(img.rows(), 3);
        assert_eq!(img.cols(), 6);
        assert_eq!(img.height(1.0, 0.5), 0.0);
    }

    #[test]
    fn test_skirt_sits_below_world() {
        let skirt = TerrainHeightField::skirt(4.0).unwrap();
        assert_eq!(skirt.height(5000.0, -5000.0), BELOW_WORLD_HEIGHT - 1.0);
        assert_eq!(skirt.rows(), SKIRT_GRID);
    }
}
