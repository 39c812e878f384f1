use nalgebra::{Point3, Vector3};

/// Axis-aligned bounding box.
///
/// Starts inverted (`+inf` min, `-inf` max) so that folding points or boxes
/// into a fresh instance yields the correct union without special-casing the
/// empty state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    pub fn new() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Union with a single point.
    pub fn extend_point(&mut self, p: &Point3<f64>) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    /// Union with another box: `self = bbox(self ∪ other)`.
    pub fn merge(&mut self, other: &BoundingBox) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(other.min[i]);
            self.max[i] = self.max[i].max(other.max[i]);
        }
    }

    /// Uniform inflation: every min coordinate shrinks by `v`, every max
    /// coordinate grows by `v`.
    pub fn bloat(&mut self, v: f64) {
        for i in 0..3 {
            self.min[i] -= v;
            self.max[i] += v;
        }
    }

    /// Extent along each axis. Negative components mean the box is empty.
    pub fn extent(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Length of the longest axis, with its index.
    pub fn longest_axis(&self) -> (usize, f64) {
        let e = self.extent();
        let mut axis = 0;
        for i in 1..3 {
            if e[i] > e[axis] {
                axis = i;
            }
        }
        (axis, e[axis])
    }

    /// True when no point has been folded in, or the fold produced a
    /// non-finite or inverted extent.
    pub fn is_empty(&self) -> bool {
        let e = self.extent();
        !(0..3).all(|i| e[i].is_finite() && e[i] >= 0.0)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_box_is_empty() {
        assert!(BoundingBox::new().is_empty());
    }

    #[test]
    fn extend_and_merge_agree() {
        let pts = [
            Point3::new(0.0, -1.0, 2.0),
            Point3::new(3.0, 5.0, -2.0),
            Point3::new(1.0, 1.0, 1.0),
        ];
        let mut folded = BoundingBox::new();
        for p in &pts {
            folded.extend_point(p);
        }

        let mut merged = BoundingBox::new();
        for p in &pts {
            let mut single = BoundingBox::new();
            single.extend_point(p);
            merged.merge(&single);
        }
        assert_eq!(folded, merged);
        assert!(!folded.is_empty());
        assert_eq!(folded.min, Point3::new(0.0, -1.0, -2.0));
        assert_eq!(folded.max, Point3::new(3.0, 5.0, 2.0));
    }

    #[test]
    fn extending_never_shrinks() {
        let mut bb = BoundingBox::new();
        bb.extend_point(&Point3::new(0.0, 0.0, 0.0));
        bb.extend_point(&Point3::new(1.0, 1.0, 1.0));
        let before = bb;
        bb.extend_point(&Point3::new(0.5, 0.5, 0.5));
        assert_eq!(bb, before);
        bb.extend_point(&Point3::new(-2.0, 0.5, 0.5));
        assert!(bb.min.x < before.min.x);
        assert_eq!(bb.max, before.max);
    }

    #[test]
    fn bloat_inflates_uniformly() {
        let mut bb = BoundingBox::new();
        bb.extend_point(&Point3::new(0.0, 0.0, 0.0));
        bb.extend_point(&Point3::new(1.0, 2.0, 3.0));
        bb.bloat(0.5);
        assert_eq!(bb.min, Point3::new(-0.5, -0.5, -0.5));
        assert_eq!(bb.max, Point3::new(1.5, 2.5, 3.5));
        assert_eq!(bb.longest_axis(), (2, 4.0));
    }
}
