//! Planar-polygon geometry used by the voxel classifier.
//!
//! Overview
//! - [`Plane`] carries an orthonormal local 2D frame derived from three
//!   defining points and solves line/plane intersections through a 3x3
//!   system; point projection reduces to intersecting a probe line along
//!   the plane normal.
//! - [`Ring`] is an implicitly closed 3D vertex loop together with its
//!   cached projection into a plane's local frame, and answers 2D point
//!   containment with a winding-number sweep.
//! - [`Polygon`] is one exterior ring plus hole rings, all coplanar; its
//!   [`Polygon::cut_line`] combines the plane cut with ring containment
//!   and is the primitive the ray-voting classifier is built on.
//! - [`BoundingBox`] folds axis-aligned bounds over points and boxes.
//!
//! All coordinates are `f64`; points and vectors are nalgebra types. The
//! intersection path is hot (it runs per voxel, per axis, per polygon), so
//! the expected "no intersection" outcomes are plain enum results rather
//! than errors.

mod bbox;
mod line;
mod plane;
mod polygon;
mod ring;

pub use bbox::BoundingBox;
pub use line::Line;
pub use plane::{CutMiss, Plane, PlaneCut};
pub use polygon::Polygon;
pub(crate) use polygon::bounding_box_of;
pub use ring::Ring;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Construction-time failures for geometry that the classifier cannot use.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeometryError {
    /// A ring needs at least 3 distinct vertices to bound an area.
    #[error("ring has {vertices} vertices, need at least 3")]
    DegenerateRing { vertices: usize },
    /// The first three vertices of the exterior ring span no plane.
    #[error("plane-defining points are collinear")]
    CollinearPlanePoints,
    /// Projecting a ring vertex into its own plane failed; the supporting
    /// plane does not actually support the ring.
    #[error("ring vertex could not be projected into the polygon plane")]
    ProjectionFailed,
    /// A bounding region with no extent (empty polygon set or a single
    /// point) cannot be voxelized.
    #[error("bounding box is empty or degenerate")]
    EmptyBounds,
}

/// Cosine-angle tolerances for the parallelism tests.
///
/// Both values are empirical; they are configuration rather than constants
/// so that callers working at unusual scales can adjust them.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Tolerances {
    /// A line counts as parallel to a plane when |cos| of the angle between
    /// the line direction and the plane normal falls below this value.
    pub line_parallel_cos: f64,
    /// Two vectors count as parallel when |cos| of their angle exceeds
    /// this value. Used to reject collinear plane-defining points.
    pub vector_parallel_cos: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            line_parallel_cos: 1e-4,
            vector_parallel_cos: 0.9999,
        }
    }
}

/// Tests whether two vectors are parallel under the cosine-angle tolerance.
pub fn vectors_parallel(a: &Vector3<f64>, b: &Vector3<f64>, tol: &Tolerances) -> bool {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return true;
    }
    (a.dot(b) / denom).abs() > tol.vector_parallel_cos
}
