use crate::estimator::EstimatorError;
use crate::geometry::Polygon;
use serde::Serialize;

/// One object queued for volume estimation: an identifier (building id or
/// file stem) and its boundary polygons.
#[derive(Debug)]
pub struct ObjectInput {
    pub id: String,
    pub polygons: Vec<Polygon>,
}

/// Successful per-object result record.
#[derive(Clone, Debug, Serialize)]
pub struct ObjectReport {
    pub id: String,
    /// Estimated volume in cubic model units.
    pub volume: f64,
    /// Compute time for this object, excluding input parsing.
    pub elapsed_ms: f64,
    /// Voxel counts per vote value 0..=6; present in expectation mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_counts: Option<[usize; 7]>,
}

/// Outcome of one object in a batch: the report, or the error that stopped
/// this object without affecting its siblings.
#[derive(Debug)]
pub struct ObjectOutcome {
    pub id: String,
    pub result: Result<ObjectReport, EstimatorError>,
}

impl ObjectOutcome {
    pub fn report(&self) -> Option<&ObjectReport> {
        self.result.as_ref().ok()
    }
}
