use super::{BoundingBox, GeometryError, Line, Plane, Ring, Tolerances};

/// A planar polygon: one exterior ring plus zero or more interior (hole)
/// rings, all assumed coplanar.
///
/// The supporting plane derives from the first three vertices of the
/// exterior ring; whether the polygon is actually flat is not checked, and a
/// non-flat input degrades the containment test rather than failing it.
/// Holes are assumed to lie fully inside the exterior ring. All rings are
/// projected into the plane's local frame once, at construction.
#[derive(Clone, Debug)]
pub struct Polygon {
    exterior: Ring,
    interior: Vec<Ring>,
    plane: Plane,
    tol: Tolerances,
}

impl Polygon {
    pub fn new(
        mut exterior: Ring,
        mut interior: Vec<Ring>,
        tol: Tolerances,
    ) -> Result<Self, GeometryError> {
        let pts = exterior.points();
        let plane = Plane::from_points(&pts[0], &pts[1], &pts[2], &tol)?;
        exterior.project(&plane, &tol)?;
        for ring in &mut interior {
            ring.project(&plane, &tol)?;
        }
        Ok(Self {
            exterior,
            interior,
            plane,
            tol,
        })
    }

    /// Convenience constructor for a hole-free polygon.
    pub fn from_exterior(exterior: Ring, tol: Tolerances) -> Result<Self, GeometryError> {
        Self::new(exterior, Vec::new(), tol)
    }

    pub fn exterior(&self) -> &Ring {
        &self.exterior
    }

    pub fn interiors(&self) -> &[Ring] {
        &self.interior
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Intersects an infinite line with the polygon.
    ///
    /// Returns the signed parameter along the line when the plane hit point
    /// lies inside the exterior ring and outside every hole; `None` when the
    /// line is parallel to the plane, the system is singular, or the hit
    /// misses the polygon. A genuine hit at exactly parameter 0 is
    /// indistinguishable from a miss for the caller; the voxelizer's
    /// bounding-box margin keeps that case off the sample points.
    pub fn cut_line(&self, line: &Line) -> Option<f64> {
        let cut = self.plane.cut_line(line, &self.tol).ok()?;
        if self.contains_local(&cut.local) {
            Some(cut.t)
        } else {
            None
        }
    }

    /// Point-in-polygon in the plane's local frame: inside the exterior
    /// ring and outside every interior ring.
    fn contains_local(&self, p: &nalgebra::Point2<f64>) -> bool {
        self.exterior.contains(p) && !self.interior.iter().any(|r| r.contains(p))
    }

    /// Axis-aligned bounds of the exterior ring.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox::new();
        for p in self.exterior.points() {
            bb.extend_point(p);
        }
        bb
    }
}

/// Union bounding box of a polygon set.
pub(crate) fn bounding_box_of(polygons: &[Polygon]) -> BoundingBox {
    let mut bb = BoundingBox::new();
    for p in polygons {
        bb.merge(&p.bounding_box());
    }
    bb
}
