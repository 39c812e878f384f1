#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod batch;
pub mod config;
pub mod estimator;
pub mod geometry;
pub mod io;
pub mod types;
pub mod voxel;

// --- High-level re-exports -------------------------------------------------

// Main entry points: estimator + batch driver.
pub use crate::batch::{run_batch, run_directory, BatchOptions};
pub use crate::estimator::{EstimatorOptions, VolumeEstimate, VolumeEstimator};
pub use crate::types::{ObjectInput, ObjectOutcome, ObjectReport};

// Geometry building blocks callers need to assemble inputs by hand.
pub use crate::geometry::{Polygon, Ring, Tolerances};

/// Small prelude for quick experiments.
///
/// ```no_run
/// use voxcell::prelude::*;
/// use nalgebra::Point3;
///
/// # fn main() {
/// let ring = Ring::new(vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ])
/// .unwrap();
/// let polygon = Polygon::from_exterior(ring, Tolerances::default()).unwrap();
///
/// let estimator = VolumeEstimator::new(EstimatorOptions::default()).unwrap();
/// match estimator.compute(&[polygon]) {
///     Ok(estimate) => println!("volume={:.3}", estimate.volume),
///     Err(e) => eprintln!("estimation failed: {e}"),
/// }
/// # }
/// ```
pub mod prelude {
    pub use crate::estimator::{EstimatorOptions, VolumeEstimator};
    pub use crate::geometry::{Polygon, Ring, Tolerances};
    pub use crate::types::{ObjectInput, ObjectReport};
}
