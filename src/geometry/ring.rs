use super::{GeometryError, Plane, Tolerances};
use nalgebra::{Point2, Point3};

/// An implicitly closed 3D vertex loop (the last vertex connects back to the
/// first), together with the cached projection of its vertices into some
/// plane's local 2D frame.
#[derive(Clone, Debug)]
pub struct Ring {
    pos: Vec<Point3<f64>>,
    pos2d: Vec<Point2<f64>>,
}

impl Ring {
    /// Builds a ring from an ordered vertex loop.
    ///
    /// An explicitly repeated closing vertex (last == first) is dropped.
    /// Fewer than 3 distinct vertices leave nothing to bound and are
    /// rejected.
    pub fn new(mut points: Vec<Point3<f64>>) -> Result<Self, GeometryError> {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            return Err(GeometryError::DegenerateRing {
                vertices: points.len(),
            });
        }
        Ok(Self {
            pos: points,
            pos2d: Vec::new(),
        })
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.pos
    }

    pub fn projected(&self) -> &[Point2<f64>] {
        &self.pos2d
    }

    /// Projects every vertex into the local frame of `plane`, replacing any
    /// previous projection.
    ///
    /// The probe lines run along the plane normal, so the cut cannot be
    /// parallel; a failure here means the plane does not belong to this
    /// ring.
    pub fn project(&mut self, plane: &Plane, tol: &Tolerances) -> Result<(), GeometryError> {
        let mut projected = Vec::with_capacity(self.pos.len());
        for p in &self.pos {
            let local = plane
                .project(p, tol)
                .map_err(|_| GeometryError::ProjectionFailed)?;
            projected.push(local);
        }
        self.pos2d = projected;
        Ok(())
    }

    /// Winding-number point-in-ring test over the projected vertices.
    ///
    /// Walks every edge of the closed loop and accumulates signed crossings
    /// of the horizontal sweep line through `p`. The `>=`/`<` split on the
    /// y comparison keeps vertices lying exactly on the sweep line from
    /// being counted twice. Non-zero winding means inside.
    pub fn contains(&self, p: &Point2<f64>) -> bool {
        let n = self.pos2d.len();
        // An unprojected ring bounds nothing.
        if n < 3 {
            return false;
        }

        let x = p.x;
        let y = p.y;
        let mut counter = 0i32;

        let mut p1 = self.pos2d[n - 1];
        let mut p2 = self.pos2d[0];
        let mut start_above = p1.y >= y;
        for i in 1..=n {
            let end_above = p2.y >= y;
            if start_above != end_above {
                // Orientation test: on which side of the edge does the
                // sweep point sit at the crossing height?
                if (p2.y - y) * (p2.x - p1.x) <= (p2.y - p1.y) * (p2.x - x) {
                    if end_above {
                        counter += 1;
                    }
                } else if !end_above {
                    counter -= 1;
                }
            }
            start_above = end_above;
            if i < n {
                p1 = p2;
                p2 = self.pos2d[i];
            }
        }

        counter != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn unit_square() -> Ring {
        let mut ring = Ring::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ])
        .unwrap();
        let plane = Plane::from_points(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
            &Tolerances::default(),
        )
        .unwrap();
        ring.project(&plane, &Tolerances::default()).unwrap();
        ring
    }

    #[test]
    fn too_few_vertices_rejected() {
        let err = Ring::new(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)])
            .unwrap_err();
        assert_eq!(err, GeometryError::DegenerateRing { vertices: 2 });
    }

    #[test]
    fn closing_vertex_dropped() {
        let ring = Ring::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(ring.points().len(), 3);
    }

    #[test]
    fn centroid_is_inside() {
        let ring = unit_square();
        // The square projects onto the plane's (r1, r2) frame; test the
        // centroid and a clearly outside point in that same frame.
        let centroid = centroid_2d(&ring);
        assert!(ring.contains(&centroid));
    }

    #[test]
    fn far_point_is_outside() {
        let ring = unit_square();
        assert!(!ring.contains(&Point2::new(50.0, 50.0)));
        assert!(!ring.contains(&Point2::new(-50.0, 0.3)));
    }

    #[test]
    fn vertex_on_sweep_line_not_double_counted() {
        // Diamond whose top/bottom vertices sit exactly on the sweep line
        // of interior test points.
        let mut ring = Ring::new(vec![
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
        ])
        .unwrap();
        let plane = Plane::from_points(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
            &Tolerances::default(),
        )
        .unwrap();
        ring.project(&plane, &Tolerances::default()).unwrap();

        let center = centroid_2d(&ring);
        assert!(ring.contains(&center));
        // Sweep through the side vertices: still inside at the center
        // height, outside beyond the left/right tips.
        let left_tip = ring.projected()[3];
        let outside = Point2::new(left_tip.x - 1.0, left_tip.y);
        assert!(!ring.contains(&outside));
    }

    fn centroid_2d(ring: &Ring) -> Point2<f64> {
        let n = ring.projected().len() as f64;
        let sum = ring
            .projected()
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + Vector3::new(p.x, p.y, 0.0));
        Point2::new(sum.x / n, sum.y / n)
    }
}
