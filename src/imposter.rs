//! Imposter primitives: the shapes a bounding cube can stand in for.

use glam::DAffine3;

use crate::cone::ConeSegment;
use crate::sphere::Sphere;

/// An analytic primitive drawn through flat bounding geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Imposter {
    /// Sphere imposter.
    Sphere(Sphere),
    /// Tapered cone imposter.
    Cone(ConeSegment),
}

impl Imposter {
    /// Short name used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Imposter::Sphere(_) => "sphere",
            Imposter::Cone(_) => "cone",
        }
    }

    /// Primitive moved by a rigid transform, e.g. into eye space.
    pub fn transformed(&self, transform: &DAffine3) -> Imposter {
        match self {
            Imposter::Sphere(sphere) => Imposter::Sphere(sphere.transformed(transform)),
            Imposter::Cone(cone) => Imposter::Cone(cone.transformed(transform)),
        }
    }
}

impl From<Sphere> for Imposter {
    fn from(sphere: Sphere) -> Self {
        Imposter::Sphere(sphere)
    }
}

impl From<ConeSegment> for Imposter {
    fn from(cone: ConeSegment) -> Self {
        Imposter::Cone(cone)
    }
}
