//! Three-component vector value type used by imposter geometry.
//!
//! A thin wrapper over [`glam::DVec3`] exposing named, pure operations.
//! Division by a zero scalar is reported as an error instead of producing
//! infinities.

use glam::DVec3;

use crate::error::GeometryError;

/// Ordered triple of `f64` components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3(DVec3);

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Vec3 = Vec3(DVec3::ZERO);
    /// Unit X.
    pub const X: Vec3 = Vec3(DVec3::X);
    /// Unit Y.
    pub const Y: Vec3 = Vec3(DVec3::Y);
    /// Unit Z.
    pub const Z: Vec3 = Vec3(DVec3::Z);

    /// Create a vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self(DVec3::new(x, y, z))
    }

    /// X component.
    pub fn x(self) -> f64 {
        self.0.x
    }

    /// Y component.
    pub fn y(self) -> f64 {
        self.0.y
    }

    /// Z component.
    pub fn z(self) -> f64 {
        self.0.z
    }

    /// Component-wise sum.
    pub fn add(self, rhs: Vec3) -> Vec3 {
        Vec3(self.0 + rhs.0)
    }

    /// Component-wise difference `self - rhs`.
    pub fn subtract(self, rhs: Vec3) -> Vec3 {
        Vec3(self.0 - rhs.0)
    }

    /// Multiply every component by `s`.
    pub fn scale(self, s: f64) -> Vec3 {
        Vec3(self.0 * s)
    }

    /// Divide every component by `s`.
    ///
    /// Fails with [`GeometryError::DivisionByZero`] when `s == 0`.
    pub fn try_div(self, s: f64) -> Result<Vec3, GeometryError> {
        if s == 0.0 {
            return Err(GeometryError::DivisionByZero);
        }
        Ok(Vec3(self.0 / s))
    }

    /// Sum of component products.
    pub fn dot(self, rhs: Vec3) -> f64 {
        self.0.dot(rhs.0)
    }

    /// Right-handed cross product `self × rhs`.
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3(self.0.cross(rhs.0))
    }

    /// Euclidean length.
    pub fn norm(self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Squared Euclidean length, `self · self`.
    pub fn norm_squared(self) -> f64 {
        self.dot(self)
    }

    /// Unit vector in the same direction. Fails for the zero vector.
    pub fn try_normalize(self) -> Result<Vec3, GeometryError> {
        self.try_div(self.norm())
    }

    /// True if no component is NaN or infinite.
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Components as an array.
    pub fn to_array(self) -> [f64; 3] {
        self.0.to_array()
    }

    /// Components narrowed to `f32`, the precision of vertex attributes.
    pub fn to_f32_array(self) -> [f32; 3] {
        self.0.as_vec3().to_array()
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

impl TryFrom<&[f64]> for Vec3 {
    type Error = GeometryError;

    fn try_from(v: &[f64]) -> Result<Self, Self::Error> {
        match v {
            &[x, y, z] => Ok(Vec3::new(x, y, z)),
            _ => Err(GeometryError::Dimension { len: v.len() }),
        }
    }
}

impl From<DVec3> for Vec3 {
    fn from(v: DVec3) -> Self {
        Vec3(v)
    }
}

impl From<Vec3> for DVec3 {
    fn from(v: Vec3) -> Self {
        v.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_cross_is_right_handed() {
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(Vec3::Z), Vec3::X);
        assert_eq!(Vec3::Z.cross(Vec3::X), Vec3::Y);
        assert_eq!(Vec3::Y.cross(Vec3::X), Vec3::Z.scale(-1.0));
    }

    #[test]
    fn test_arithmetic_does_not_mutate_operands() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(-4.0, 0.5, 2.0);
        let sum = a.add(b);
        let diff = a.subtract(b);
        assert_eq!(sum, Vec3::new(-3.0, 2.5, 5.0));
        assert_eq!(diff, Vec3::new(5.0, 1.5, 1.0));
        assert_eq!(a, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b, Vec3::new(-4.0, 0.5, 2.0));
    }

    #[test]
    fn test_dot_and_norm() {
        let v = Vec3::new(2.0, -3.0, 6.0);
        assert!((v.dot(Vec3::new(1.0, 1.0, 1.0)) - 5.0).abs() < EPS);
        assert!((v.norm_squared() - 49.0).abs() < EPS);
        assert!((v.norm() - 7.0).abs() < EPS);
    }

    #[test]
    fn test_division_by_zero_fails() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.try_div(0.0), Err(GeometryError::DivisionByZero));
        assert_eq!(v.try_div(2.0), Ok(Vec3::new(0.5, 1.0, 1.5)));
        assert_eq!(Vec3::ZERO.try_normalize(), Err(GeometryError::DivisionByZero));
    }

    #[test]
    fn test_slice_conversion_checks_length() {
        let ok: &[f64] = &[1.0, 2.0, 3.0];
        let short: &[f64] = &[1.0, 2.0];
        assert_eq!(Vec3::try_from(ok), Ok(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(Vec3::try_from(short), Err(GeometryError::Dimension { len: 2 }));
    }
}
