use nalgebra::{Point3, Rotation3, Vector3};
use std::fmt;
use std::ops::Mul;

/// A proper rigid-body motion `x ↦ R·x + t` in three dimensions.
///
/// Composition follows function composition: `a * b` applies `b` first and
/// `a` second, so `(a * b).apply(p) == a.apply(&b.apply(p))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    rotation: Rotation3<f64>,
    translation: Vector3<f64>,
}

impl RigidTransform {
    pub fn new(rotation: Rotation3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Rotation3::identity(), Vector3::zeros())
    }

    /// Creates a pure translation.
    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self::new(Rotation3::identity(), translation)
    }

    /// Creates a pure rotation about the origin.
    pub fn from_rotation(rotation: Rotation3<f64>) -> Self {
        Self::new(rotation, Vector3::zeros())
    }

    pub fn rotation(&self) -> &Rotation3<f64> {
        &self.rotation
    }

    pub fn translation(&self) -> &Vector3<f64> {
        &self.translation
    }

    /// Maps a point through the transform.
    #[inline]
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        self.rotation * point + self.translation
    }

    /// Maps a direction through the transform; translation does not apply.
    #[inline]
    pub fn apply_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * vector
    }

    pub fn inverse(&self) -> Self {
        let inverse_rotation = self.rotation.inverse();
        Self::new(inverse_rotation, -(inverse_rotation * self.translation))
    }

    /// Returns the Euler angles (roll, pitch, yaw) of the rotational part, in radians.
    pub fn euler_angles(&self) -> (f64, f64, f64) {
        self.rotation.euler_angles()
    }

    /// Compares rotation matrices and translations component-wise within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        let rotation_diff = (self.rotation.matrix() - other.rotation.matrix()).amax();
        let translation_diff = (self.translation - other.translation).amax();
        rotation_diff <= tolerance && translation_diff <= tolerance
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for RigidTransform {
    type Output = RigidTransform;

    fn mul(self, rhs: RigidTransform) -> Self::Output {
        RigidTransform::new(
            self.rotation * rhs.rotation,
            self.rotation * rhs.translation + self.translation,
        )
    }
}

impl Mul<Point3<f64>> for RigidTransform {
    type Output = Point3<f64>;

    fn mul(self, rhs: Point3<f64>) -> Self::Output {
        self.apply(&rhs)
    }
}

impl Mul<&Point3<f64>> for &RigidTransform {
    type Output = Point3<f64>;

    fn mul(self, rhs: &Point3<f64>) -> Self::Output {
        self.apply(rhs)
    }
}

impl fmt::Display for RigidTransform {
    /// Writes `roll pitch yaw tx ty tz`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (roll, pitch, yaw) = self.euler_angles();
        let t = &self.translation;
        write!(
            f,
            "{:.6} {:.6} {:.6} {:.6} {:.6} {:.6}",
            unsigned_zero(roll),
            unsigned_zero(pitch),
            unsigned_zero(yaw),
            unsigned_zero(t.x),
            unsigned_zero(t.y),
            unsigned_zero(t.z)
        )
    }
}

/// Maps values that print as zero at six decimals to `+0.0`, so `-0.000000` never appears.
fn unsigned_zero(value: f64) -> f64 {
    if value.abs() < 5e-7 { 0.0 } else { value }
}
