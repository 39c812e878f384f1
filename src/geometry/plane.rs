use super::{vectors_parallel, GeometryError, Line, Tolerances};
use nalgebra::{Matrix3, Point2, Point3, Vector3};

/// A plane with an orthonormal local 2D frame.
///
/// `r1` and `r2` span the plane and are mutually orthogonal unit vectors;
/// `normal` is their unit cross product. `lambda` is the signed offset
/// `normal · origin` of the plane from the global origin.
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub origin: Point3<f64>,
    pub normal: Vector3<f64>,
    pub r1: Vector3<f64>,
    pub r2: Vector3<f64>,
    pub lambda: f64,
}

/// A successful line/plane intersection.
///
/// `local` holds the in-plane coordinates of the hit in the `(r1, r2)`
/// frame; `t` is the signed parameter along the intersecting line.
#[derive(Clone, Copy, Debug)]
pub struct PlaneCut {
    pub local: Point2<f64>,
    pub t: f64,
}

/// Expected no-intersection outcomes of the line/plane cut.
///
/// Both cases are routine during ray casting and are handled identically by
/// callers: the ray simply misses this polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CutMiss {
    /// Line direction is parallel to the plane within tolerance.
    Parallel,
    /// The 3x3 system is numerically singular despite passing the
    /// parallelism check.
    Singular,
}

impl Plane {
    /// Builds the plane through points `a`, `b`, `c`.
    ///
    /// The frame is derived as `r1 = norm(a - b)`, `normal = norm(r1 × (a - c))`,
    /// `r2 = normal × r1`. Fails when the three points are collinear (or
    /// coincident) under the vector-parallel tolerance.
    pub fn from_points(
        a: &Point3<f64>,
        b: &Point3<f64>,
        c: &Point3<f64>,
        tol: &Tolerances,
    ) -> Result<Self, GeometryError> {
        let d1 = a - b;
        let d2 = a - c;
        if vectors_parallel(&d1, &d2, tol) {
            return Err(GeometryError::CollinearPlanePoints);
        }
        let r1 = d1
            .try_normalize(0.0)
            .ok_or(GeometryError::CollinearPlanePoints)?;
        let d2 = d2
            .try_normalize(0.0)
            .ok_or(GeometryError::CollinearPlanePoints)?;
        let normal = r1
            .cross(&d2)
            .try_normalize(0.0)
            .ok_or(GeometryError::CollinearPlanePoints)?;
        // Re-orthogonalize: r2 completes the right-handed in-plane frame.
        let r2 = normal.cross(&r1);
        let lambda = normal.dot(&a.coords);
        Ok(Self {
            origin: *a,
            normal,
            r1,
            r2,
            lambda,
        })
    }

    /// True when the line direction lies in the plane within tolerance.
    pub fn is_parallel(&self, line: &Line, tol: &Tolerances) -> bool {
        let denom = self.normal.norm() * line.direction.norm();
        if denom == 0.0 {
            return true;
        }
        let cos_angle = (self.normal.dot(&line.direction) / denom).abs();
        cos_angle < tol.line_parallel_cos
    }

    /// Intersects an infinite line with the plane.
    ///
    /// Solves `origin + a·r1 + b·r2 = line.point + t·direction` by inverting
    /// the matrix with columns `[r1, r2, -direction]`. The parallelism test
    /// runs first; a singular system that slips past it is reported as
    /// [`CutMiss::Singular`] and treated the same by callers.
    pub fn cut_line(&self, line: &Line, tol: &Tolerances) -> Result<PlaneCut, CutMiss> {
        if self.is_parallel(line, tol) {
            return Err(CutMiss::Parallel);
        }
        let m = Matrix3::from_columns(&[self.r1, self.r2, -line.direction]);
        let inv = m.try_inverse().ok_or(CutMiss::Singular)?;
        let x = inv * (line.point - self.origin);
        Ok(PlaneCut {
            local: Point2::new(x.x, x.y),
            t: x.z,
        })
    }

    /// Projects a point into the plane's local 2D frame.
    ///
    /// Implemented as intersection with the probe line through `p` along the
    /// plane normal, which by construction can never be parallel.
    pub fn project(&self, p: &Point3<f64>, tol: &Tolerances) -> Result<Point2<f64>, CutMiss> {
        self.cut_line(&Line::new(*p, self.normal), tol)
            .map(|cut| cut.local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn xy_plane() -> Plane {
        Plane::from_points(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
            &Tolerances::default(),
        )
        .unwrap()
    }

    #[test]
    fn frame_is_orthonormal() {
        let p = xy_plane();
        assert_relative_eq!(p.r1.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.r2.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.normal.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.r1.dot(&p.r2), 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.r1.dot(&p.normal), 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.r2.dot(&p.normal), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn collinear_points_rejected() {
        let err = Plane::from_points(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(2.0, 0.0, 0.0),
            &Tolerances::default(),
        )
        .unwrap_err();
        assert_eq!(err, GeometryError::CollinearPlanePoints);
    }

    #[test]
    fn in_plane_direction_is_parallel() {
        let p = xy_plane();
        let tol = Tolerances::default();
        let line = Line::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(1.0, 0.0, 0.0));
        assert!(matches!(p.cut_line(&line, &tol), Err(CutMiss::Parallel)));
    }

    #[test]
    fn normal_direction_is_never_parallel() {
        let p = xy_plane();
        let tol = Tolerances::default();
        let line = Line::new(Point3::new(0.25, 0.5, 5.0), p.normal);
        let cut = p.cut_line(&line, &tol).unwrap();
        assert_relative_eq!(cut.t.abs(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(line.at(cut.t).z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn projection_matches_cut_coordinates() {
        let p = Plane::from_points(
            &Point3::new(1.0, 2.0, 3.0),
            &Point3::new(4.0, 2.0, 3.5),
            &Point3::new(1.0, 6.0, 2.0),
            &Tolerances::default(),
        )
        .unwrap();
        let tol = Tolerances::default();
        let probe = Point3::new(2.0, 3.0, 4.0);
        let local = p.project(&probe, &tol).unwrap();
        // Reconstruct the projected 3D point from local coordinates and
        // verify it lies on the plane at the same in-plane position.
        let back = p.origin + p.r1 * local.x + p.r2 * local.y;
        assert_relative_eq!(p.normal.dot(&back.coords), p.lambda, epsilon = 1e-9);
        let again = p.project(&back, &tol).unwrap();
        assert_relative_eq!(again.x, local.x, epsilon = 1e-9);
        assert_relative_eq!(again.y, local.y, epsilon = 1e-9);
    }
}
