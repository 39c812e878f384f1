//! Parameter types for the volume estimator and the batch driver.
//!
//! Defaults follow the values that proved robust on real building models:
//! a 1-unit voxel, a 3-of-6 direction vote, and a small bounding-box margin
//! that keeps sample rays off exact polygon edges.

use crate::geometry::Tolerances;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Rejections from [`EstimatorOptions::validate`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("voxel size must be positive and finite, got {0}")]
    VoxelSize(f64),
    #[error("min_directions must be at most 6, got {0}")]
    MinDirections(u8),
    #[error("max_directions must be in 1..=6, got {0}")]
    MaxDirections(u8),
    #[error("bbox_margin must be non-negative and finite, got {0}")]
    BboxMargin(f64),
    #[error("worker count must be positive")]
    Workers,
}

/// Per-object estimator configuration.
///
/// A snapshot of this struct is captured per computation; nothing reads it
/// through shared mutable state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorOptions {
    /// Edge length of the equilateral voxels.
    pub voxel_size: f64,
    /// Minimum number of the six ray directions that must vote "inside"
    /// for a voxel to count as inside in binary mode.
    pub min_directions: u8,
    /// Normalizer for the expectation-value volume: a voxel contributes
    /// `vote / max_directions` cells.
    pub max_directions: u8,
    /// Collapse coincident ray/polygon intersections into one crossing.
    /// Handles duplicated or overlapping boundary polygons at extra cost.
    pub dedup_intersections: bool,
    /// Uniform inflation of the object bounding box before voxelization,
    /// pushing sample rays off exact polygon edges and vertices.
    pub bbox_margin: f64,
    /// Parallelism tolerances for the plane and ring geometry.
    pub tolerances: Tolerances,
    /// Voxel-grid OBJ export, disabled by default.
    pub export: ExportOptions,
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        Self {
            voxel_size: 1.0,
            min_directions: 3,
            max_directions: 6,
            dedup_intersections: false,
            bbox_margin: 0.005,
            tolerances: Tolerances::default(),
            export: ExportOptions::default(),
        }
    }
}

impl EstimatorOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(self.voxel_size > 0.0) || !self.voxel_size.is_finite() {
            return Err(OptionsError::VoxelSize(self.voxel_size));
        }
        if self.min_directions > 6 {
            return Err(OptionsError::MinDirections(self.min_directions));
        }
        if self.max_directions == 0 || self.max_directions > 6 {
            return Err(OptionsError::MaxDirections(self.max_directions));
        }
        if !(self.bbox_margin >= 0.0) || !self.bbox_margin.is_finite() {
            return Err(OptionsError::BboxMargin(self.bbox_margin));
        }
        Ok(())
    }
}

/// Voxel-grid export configuration.
///
/// `full` and `shell` write to the same targets, so enabling both lets the
/// shell pass clobber the full one; a warning is logged when that happens.
/// In expectation mode the grid holds raw votes, so `full` switches to the
/// per-vote export and `shell` is unavailable.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Write every face of every voxel.
    pub full: bool,
    /// Write only faces on the classification boundary.
    pub shell: bool,
    /// Target for outside voxels (value 0); per-vote files derive from
    /// this path in expectation mode.
    pub outer_path: Option<PathBuf>,
    /// Target for inside voxels (value 1).
    pub inner_path: Option<PathBuf>,
}

impl ExportOptions {
    pub fn enabled(&self) -> bool {
        (self.full || self.shell) && (self.outer_path.is_some() || self.inner_path.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(EstimatorOptions::default().validate(), Ok(()));
    }

    #[test]
    fn invalid_values_rejected() {
        let mut o = EstimatorOptions::default();
        o.voxel_size = 0.0;
        assert_eq!(o.validate(), Err(OptionsError::VoxelSize(0.0)));

        let mut o = EstimatorOptions::default();
        o.min_directions = 7;
        assert_eq!(o.validate(), Err(OptionsError::MinDirections(7)));

        let mut o = EstimatorOptions::default();
        o.max_directions = 0;
        assert_eq!(o.validate(), Err(OptionsError::MaxDirections(0)));

        let mut o = EstimatorOptions::default();
        o.bbox_margin = f64::NAN;
        assert!(o.validate().is_err());
    }

    #[test]
    fn options_roundtrip_through_json() {
        let o = EstimatorOptions {
            voxel_size: 0.25,
            dedup_intersections: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&o).unwrap();
        let back: EstimatorOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back.voxel_size, 0.25);
        assert!(back.dedup_intersections);
        assert_eq!(back.min_directions, 3);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let back: EstimatorOptions = serde_json::from_str(r#"{"voxel_size": 2.0}"#).unwrap();
        assert_eq!(back.voxel_size, 2.0);
        assert_eq!(back.max_directions, 6);
    }
}
