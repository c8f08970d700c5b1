//! Tapered cone segment that exactly joins two spheres.
//!
//! The lateral surface of the cone is tangent to both spheres, so a chain of
//! spheres joined by cone segments renders as one smooth tube. Because the
//! surface is tangent rather than equatorial, each terminus sits slightly
//! off its sphere's center and has a radius a little smaller than the sphere.

use glam::{DAffine3, DVec3};

use crate::error::GeometryError;
use crate::sphere::Sphere;
use crate::vec3::Vec3;

/// Cone segment derived from two spheres. Read-only once built.
///
/// Terminal `r1` always belongs to the smaller sphere and `r2` to the larger
/// one, so `r1 <= r2` and `taper >= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeSegment {
    /// Half-axis vector, pointing from the larger terminus toward the smaller.
    axis: Vec3,
    /// Distance between the two termini, `2 * |axis|`.
    length: f64,
    /// Midpoint between the termini.
    center: Vec3,
    /// Radius at `center`, the mean of the terminal radii.
    radius: f64,
    /// Radius decrease per unit length travelled along `axis`.
    taper: f64,
    /// Terminal radius at the smaller sphere.
    r1: f64,
    /// Terminal radius at the larger sphere.
    r2: f64,
}

impl ConeSegment {
    /// Build the cone tangent to both spheres.
    ///
    /// Fails when the centers coincide, when either sphere contains the
    /// other (no tangent cone), or when inputs are not finite.
    pub fn new(sphere1: &Sphere, sphere2: &Sphere) -> Result<Self, GeometryError> {
        let (mut cs1, mut rs1) = (sphere1.center, sphere1.radius);
        let (mut cs2, mut rs2) = (sphere2.center, sphere2.radius);
        if !(cs1.is_finite() && cs2.is_finite() && rs1.is_finite() && rs2.is_finite()) {
            return Err(GeometryError::NonFinite);
        }

        // Swap so rs2 is always the largest
        if rs2 < rs1 {
            std::mem::swap(&mut cs1, &mut cs2);
            std::mem::swap(&mut rs1, &mut rs2);
        }

        let d = cs2.subtract(cs1).norm();
        if !d.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        if d == 0.0 {
            return Err(GeometryError::CoincidentCenters);
        }

        // Half cone angle, to just touch each sphere
        let sin_alpha = (rs2 - rs1) / d;
        if sin_alpha > 1.0 {
            return Err(GeometryError::NoTangentCone { sin_alpha });
        }
        let cos_alpha = (1.0 - sin_alpha * sin_alpha).sqrt();

        let r1 = cos_alpha * rs1;
        let r2 = cos_alpha * rs2;

        // Termini are pushed toward the smaller sphere by sin(alpha) * radius
        let a_hat = cs1.subtract(cs2).try_div(d)?;
        let c1 = cs1.add(a_hat.scale(sin_alpha * rs1));
        let c2 = cs2.add(a_hat.scale(sin_alpha * rs2));

        let axis = c1.subtract(c2).scale(0.5);
        let length = axis.norm() * 2.0;
        if length == 0.0 {
            // Internally tangent spheres collapse the cone to a point
            return Err(GeometryError::NoTangentCone { sin_alpha });
        }

        let cone = Self {
            axis,
            length,
            center: c1.add(c2).scale(0.5),
            radius: (r1 + r2) / 2.0,
            taper: (r2 - r1) / length,
            r1,
            r2,
        };
        let scalars = [cone.length, cone.radius, cone.taper, cone.r1, cone.r2];
        if !(cone.axis.is_finite() && cone.center.is_finite() && scalars.iter().all(|v| v.is_finite())) {
            return Err(GeometryError::NonFinite);
        }
        Ok(cone)
    }

    /// Half-axis vector, larger terminus toward smaller.
    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    /// Distance between the two termini.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Midpoint between the termini.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Radius at the center.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Radius decrease per unit length along the axis.
    pub fn taper(&self) -> f64 {
        self.taper
    }

    /// Terminal radius at the smaller sphere.
    pub fn r1(&self) -> f64 {
        self.r1
    }

    /// Terminal radius at the larger sphere.
    pub fn r2(&self) -> f64 {
        self.r2
    }

    /// Unit vector along `axis`.
    pub fn axis_direction(&self) -> Vec3 {
        self.axis.scale(2.0 / self.length)
    }

    /// Radius at signed distance `h` from `center` along `axis`.
    pub fn radius_at(&self, h: f64) -> f64 {
        self.radius - self.taper * h
    }

    /// Cone moved by a rigid transform.
    ///
    /// Only the center and axis move; radii and taper are invariant under
    /// rotation and translation.
    pub fn transformed(&self, transform: &DAffine3) -> Self {
        let center = transform.transform_point3(DVec3::from(self.center));
        let axis = transform.transform_vector3(DVec3::from(self.axis));
        Self {
            axis: axis.into(),
            center: center.into(),
            ..*self
        }
    }
}
