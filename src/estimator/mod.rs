//! Per-object volume estimation by voxelized ray voting.
//!
//! Overview
//! - The object is given as a soup of boundary polygons; meshes of real
//!   building models are often leaky or non-manifold, so no topology is
//!   assumed beyond "the polygons roughly bound a solid".
//! - The union bounding box, inflated by a small margin, is voxelized at
//!   the configured edge length.
//! - From every voxel sample point three axis-aligned lines are cast, each
//!   standing for two opposite rays. A ray votes "inside" when it crosses
//!   the boundary an odd number of times; a voxel collects 0..=6 votes.
//! - Binary mode thresholds the vote (`min_directions` of 6); expectation
//!   mode keeps the raw vote and sums `vote / max_directions` into a
//!   fractional volume.
//!
//! One estimator run is a pure function of (polygons, options); the voxel
//! grid it returns is exclusively owned by the caller.

mod options;

pub use options::{EstimatorOptions, ExportOptions, OptionsError};

use crate::geometry::{bounding_box_of, GeometryError, Line, Polygon};
use crate::voxel::VoxelGrid;
use log::{debug, warn};
use nalgebra::Vector3;
use ordered_float::OrderedFloat;
use std::collections::BTreeSet;
use thiserror::Error;

/// Failures of a per-object computation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EstimatorError {
    #[error("invalid options: {0}")]
    Options(#[from] OptionsError),
    #[error("object has no usable boundary polygons")]
    NoPolygons,
    #[error("degenerate geometry: {0}")]
    Geometry(#[from] GeometryError),
    #[error("worker pool could not be built: {0}")]
    WorkerPool(String),
}

/// Result of one estimator run.
#[derive(Debug)]
pub struct VolumeEstimate {
    /// Estimated volume in cubic model units.
    pub volume: f64,
    /// The populated voxel grid: 0/1 classifications in binary mode, raw
    /// vote counts in expectation mode.
    pub grid: VoxelGrid,
}

/// Voxelizing ray-voting volume estimator for one object.
pub struct VolumeEstimator {
    options: EstimatorOptions,
}

impl VolumeEstimator {
    pub fn new(options: EstimatorOptions) -> Result<Self, EstimatorError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &EstimatorOptions {
        &self.options
    }

    /// Binary-threshold volume: a voxel is inside iff at least
    /// `min_directions` of its six rays vote inside.
    pub fn compute(&self, polygons: &[Polygon]) -> Result<VolumeEstimate, EstimatorError> {
        let mut grid = self.allocate_grid(polygons)?;
        let (nx, ny, nz) = grid.dims();
        for x in 0..nx {
            for y in 0..ny {
                for z in 0..nz {
                    let vote = self.voxel_vote(&grid, x, y, z, polygons);
                    let inside = vote >= self.options.min_directions;
                    grid.set(x, y, z, u8::from(inside));
                }
            }
        }
        self.export_binary(&grid);
        Ok(VolumeEstimate {
            volume: grid.volume(),
            grid,
        })
    }

    /// Expectation-value volume: voxels keep their raw vote and contribute
    /// `vote / max_directions` of their cell volume.
    pub fn compute_expectation(
        &self,
        polygons: &[Polygon],
    ) -> Result<VolumeEstimate, EstimatorError> {
        let mut grid = self.allocate_grid(polygons)?;
        let (nx, ny, nz) = grid.dims();
        for x in 0..nx {
            for y in 0..ny {
                for z in 0..nz {
                    let vote = self.voxel_vote(&grid, x, y, z, polygons);
                    grid.set(x, y, z, vote);
                }
            }
        }
        self.export_expectation(&grid);
        Ok(VolumeEstimate {
            volume: grid.expected_volume(self.options.max_directions),
            grid,
        })
    }

    fn allocate_grid(&self, polygons: &[Polygon]) -> Result<VoxelGrid, EstimatorError> {
        if polygons.is_empty() {
            return Err(EstimatorError::NoPolygons);
        }
        let mut bounds = bounding_box_of(polygons);
        if bounds.is_empty() {
            return Err(EstimatorError::Geometry(GeometryError::EmptyBounds));
        }
        bounds.bloat(self.options.bbox_margin);
        let grid = VoxelGrid::new(&bounds, self.options.voxel_size)?;
        let (nx, ny, nz) = grid.dims();
        debug!(
            "voxelizing {} polygons into {}x{}x{} cells (size {})",
            polygons.len(),
            nx,
            ny,
            nz,
            self.options.voxel_size
        );
        Ok(grid)
    }

    /// Vote for one voxel: the sum over three axis-aligned lines through
    /// its sample point, two rays each, in 0..=6.
    fn voxel_vote(&self, grid: &VoxelGrid, x: usize, y: usize, z: usize, polygons: &[Polygon]) -> u8 {
        let p = grid.point_at(x, y, z);
        let axes = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ];
        axes.iter()
            .map(|dir| self.line_vote(&Line::new(p, *dir), polygons))
            .sum()
    }

    /// Vote of one line = two opposite rays from the sample point.
    ///
    /// Intersection parameters are split by sign into the two rays; each
    /// ray votes inside when it saw a nonzero, odd number of crossings.
    /// With deduplication enabled, coincident parameters on a ray collapse
    /// to a single crossing.
    fn line_vote(&self, line: &Line, polygons: &[Polygon]) -> u8 {
        if self.options.dedup_intersections {
            let mut negative: BTreeSet<OrderedFloat<f64>> = BTreeSet::new();
            let mut positive: BTreeSet<OrderedFloat<f64>> = BTreeSet::new();
            for poly in polygons {
                if let Some(t) = poly.cut_line(line) {
                    if t > 0.0 {
                        positive.insert(OrderedFloat(t));
                    } else if t < 0.0 {
                        negative.insert(OrderedFloat(t));
                    }
                }
            }
            ray_parity(positive.len()) + ray_parity(negative.len())
        } else {
            let mut negative = 0usize;
            let mut positive = 0usize;
            for poly in polygons {
                if let Some(t) = poly.cut_line(line) {
                    if t > 0.0 {
                        positive += 1;
                    } else if t < 0.0 {
                        negative += 1;
                    }
                }
            }
            ray_parity(positive) + ray_parity(negative)
        }
    }

    fn export_binary(&self, grid: &VoxelGrid) {
        let export = &self.options.export;
        if !export.enabled() {
            return;
        }
        if export.full && export.shell {
            warn!("full and shell export both enabled; the shell export overwrites the full one");
        }
        let outer = export.outer_path.as_deref();
        let inner = export.inner_path.as_deref();
        if export.full {
            if let Err(e) = grid.write_objs(outer, inner) {
                warn!("voxel OBJ export failed: {e}");
            }
        }
        if export.shell {
            if let Err(e) = grid.write_shell_objs(outer, inner) {
                warn!("voxel shell OBJ export failed: {e}");
            }
        }
    }

    fn export_expectation(&self, grid: &VoxelGrid) {
        let export = &self.options.export;
        if !export.enabled() {
            return;
        }
        if export.shell {
            warn!("shell export is not available for expectation-mode grids");
        }
        if export.full {
            if let Some(base) = export.outer_path.as_deref() {
                if let Err(e) = grid.write_vote_objs(base, self.options.max_directions) {
                    warn!("per-vote OBJ export failed: {e}");
                }
            }
        }
    }
}

fn ray_parity(crossings: usize) -> u8 {
    u8::from(crossings > 0 && crossings % 2 == 1)
}
