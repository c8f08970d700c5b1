//! Sphere primitive for imposter rendering.
//!
//! A sphere is drawn as a bounding cube whose fragments are resolved
//! against the analytic surface, see [`crate::resolver`].

use glam::{DAffine3, DVec3};

use crate::vec3::Vec3;

/// Sphere defined by center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center point of the sphere.
    pub center: Vec3,

    /// Radius of the sphere (always non-negative).
    ///
    /// Negative radius values are clamped to 0.0 in the constructor.
    pub radius: f64,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// Negative radius values are clamped to 0.0.
    pub fn new(center: impl Into<Vec3>, radius: f64) -> Self {
        Self {
            center: center.into(),
            radius: radius.max(0.0), // Ensure radius is non-negative
        }
    }

    /// Sphere moved by a rigid transform.
    ///
    /// Scaling transforms are not supported; the radius is carried over as is.
    pub fn transformed(&self, transform: &DAffine3) -> Self {
        let center = transform.transform_point3(DVec3::from(self.center));
        Self {
            center: center.into(),
            radius: self.radius,
        }
    }
}
