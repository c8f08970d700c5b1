//! Ray representation for per-sample surface resolution.
//!
//! A ray is defined as r(t) = origin + t * direction. Eye rays start at the
//! eye-space origin and pass through a fragment of the bounding geometry.

use glam::DVec3;

/// Ray in 3D space defined by origin and direction.
///
/// Mathematical representation: r(t) = origin + t * direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: DVec3,

    /// Direction vector of the ray.
    ///
    /// Not required to be normalized. The resolver works with any point on
    /// the ray as its direction, so a bounding-geometry fragment position
    /// can be used directly.
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray with origin and direction.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// Eye ray from the eye-space origin through `pos`.
    pub fn through(pos: DVec3) -> Self {
        Self::new(DVec3::ZERO, pos)
    }

    /// Compute a point at parameter t along the ray.
    ///
    /// Returns r(t) = origin + t * direction.
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + t * self.direction
    }
}
