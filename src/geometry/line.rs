use nalgebra::{Point3, Vector3};

/// An infinite line: anchor point plus direction.
///
/// The direction is not required to be unit length; intersection parameters
/// are expressed in multiples of it. A line stands for two opposite rays
/// anchored at `point`, distinguished by the sign of the parameter.
#[derive(Clone, Copy, Debug)]
pub struct Line {
    pub point: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Line {
    pub fn new(point: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { point, direction }
    }

    /// The point at parameter `t`, i.e. `point + t * direction`.
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.point + self.direction * t
    }
}
