//! Axis-aligned voxel grid of ray-casting vote counts.
//!
//! Overview
//! - The grid covers an inflated bounding region with equilateral voxels
//!   and stores one small vote counter (0..=6) per cell.
//! - Sample points sit on the regular lattice `origin + index · size`; the
//!   classifier casts its rays from them and writes the result back.
//! - Aggregation is either binary (count cells with value 1, multiply by
//!   the voxel volume) or an expectation value (sum of `vote / max_votes`
//!   per cell).
//! - `export` writes the grid as OBJ meshes for inspection: every face,
//!   only the classification shell, or one file per vote value.

mod export;

pub use export::vote_file_path;

use crate::geometry::{BoundingBox, GeometryError};
use nalgebra::Point3;

/// Grid of per-voxel vote counts over an axis-aligned region.
///
/// Voxels are equilateral with edge length `voxel_size`. The cell at index
/// `(x, y, z)` occupies `[point_at(x,y,z), point_at(x+1,y+1,z+1)]`; its
/// sample point is the lattice corner `point_at(x, y, z)`.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    origin: Point3<f64>,
    voxel_size: f64,
    nx: usize,
    ny: usize,
    nz: usize,
    data: Vec<u8>,
}

impl VoxelGrid {
    /// Allocates a zeroed grid covering `bounds` at the given edge length.
    ///
    /// Per axis the grid holds `ceil(extent / voxel_size) + 1` cells, so the
    /// lattice always straddles the region. Empty bounds or a non-positive
    /// edge length cannot be voxelized.
    pub fn new(bounds: &BoundingBox, voxel_size: f64) -> Result<Self, GeometryError> {
        if bounds.is_empty() || !(voxel_size > 0.0) || !voxel_size.is_finite() {
            return Err(GeometryError::EmptyBounds);
        }
        let e = bounds.extent();
        let nx = (e.x / voxel_size).ceil() as usize + 1;
        let ny = (e.y / voxel_size).ceil() as usize + 1;
        let nz = (e.z / voxel_size).ceil() as usize + 1;
        Ok(Self {
            origin: bounds.min,
            voxel_size,
            nx,
            ny,
            nz,
            data: vec![0; nx * ny * nz],
        })
    }

    /// Grid dimensions in cells along x, y, z.
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    pub fn voxel_size(&self) -> f64 {
        self.voxel_size
    }

    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// Volume of one cell.
    pub fn cell_volume(&self) -> f64 {
        self.voxel_size * self.voxel_size * self.voxel_size
    }

    /// Global coordinates of the lattice corner at `(x, y, z)`.
    ///
    /// Indices one past the last cell are valid here; the export code uses
    /// them for the far corners of boundary voxels.
    pub fn point_at(&self, x: usize, y: usize, z: usize) -> Point3<f64> {
        Point3::new(
            self.origin.x + x as f64 * self.voxel_size,
            self.origin.y + y as f64 * self.voxel_size,
            self.origin.z + z as f64 * self.voxel_size,
        )
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < self.nx && y < self.ny && z < self.nz);
        (x * self.ny + y) * self.nz + z
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> u8 {
        self.data[self.index(x, y, z)]
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, value: u8) {
        let i = self.index(x, y, z);
        self.data[i] = value;
    }

    /// Binary-mode volume: cells with value 1 times the cell volume.
    pub fn volume(&self) -> f64 {
        let inside = self.data.iter().filter(|&&v| v == 1).count();
        inside as f64 * self.cell_volume()
    }

    /// Expectation-value volume: `Σ (vote / max_votes)` times the cell
    /// volume. Cells holding raw vote counts contribute fractionally.
    pub fn expected_volume(&self, max_votes: u8) -> f64 {
        let max = f64::from(max_votes);
        let sum: f64 = self.data.iter().map(|&v| f64::from(v) / max).sum();
        sum * self.cell_volume()
    }

    /// Number of cells holding exactly `value`.
    pub fn count_with_value(&self, value: u8) -> usize {
        self.data.iter().filter(|&&v| v == value).count()
    }

    /// Histogram of vote values 0..=6.
    pub fn vote_histogram(&self) -> [usize; 7] {
        let mut counts = [0usize; 7];
        for &v in &self.data {
            counts[usize::from(v).min(6)] += 1;
        }
        counts
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
