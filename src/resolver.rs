//! Per-sample resolution of imposter surfaces.
//!
//! A fragment of the bounding geometry defines a view ray. Solving that ray
//! against the implicit sphere or cone gives the true surface point, its
//! analytic normal and the depth that should be written in place of the
//! flat bounding-box depth. Rays that miss the surface are discarded.
//!
//! The quadratic is split into two stages. The "linear" coefficients are
//! affine in the fragment position, so a GPU pipeline may compute them per
//! vertex and let the rasteriser interpolate them. The "nonlinear"
//! coefficients must be evaluated per sample. All positions are relative to
//! the eye, which sits at the ray origin.
//!
//! Every sample is independent of every other, so callers may evaluate them
//! in any order and in parallel.

use glam::DVec3;

use crate::camera::Projection;
use crate::imposter::Imposter;
use crate::interval::Interval;
use crate::ray::Ray;

/// Analytic primitive parameters as carried by the bounding vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImposterParams {
    /// Sphere with `center` and `radius`.
    Sphere {
        /// Sphere center
        center: DVec3,
        /// Sphere radius
        radius: f64,
    },
    /// Cone segment.
    Cone {
        /// Midpoint of the segment
        center: DVec3,
        /// Radius at `center`
        radius: f64,
        /// Half-axis vector; its length is half the segment length
        axis: DVec3,
        /// Radius decrease per unit length along `axis`
        taper: f64,
    },
}

impl From<&Imposter> for ImposterParams {
    fn from(imposter: &Imposter) -> Self {
        match imposter {
            Imposter::Sphere(sphere) => ImposterParams::Sphere {
                center: sphere.center.into(),
                radius: sphere.radius,
            },
            Imposter::Cone(cone) => ImposterParams::Cone {
                center: cone.center().into(),
                radius: cone.radius(),
                axis: cone.axis().into(),
                taper: cone.taper(),
            },
        }
    }
}

/// Result of a sample that hit the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Ray parameter of the hit
    pub t: f64,
    /// Surface point in eye space
    pub point: DVec3,
    /// Outward unit normal at `point`
    pub normal: DVec3,
    /// Window-space depth of `point` in [0, 1]
    pub depth: f64,
}

/// Per-sample quadratic terms `a` and discriminant of `a t² + 2 b t + c = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonlinearCoeffs {
    /// Quadratic coefficient
    pub a: f64,
    /// `b² - a c` for the half linear coefficient `b`
    pub discriminant: f64,
}

impl NonlinearCoeffs {
    /// True when the ray does not cross the surface.
    ///
    /// A zero discriminant (grazing ray) counts as a miss.
    pub fn misses(&self) -> bool {
        !(self.discriminant > 0.0)
    }

    /// Both roots in ascending order.
    fn roots(&self, half_b: f64, c: f64) -> [f64; 2] {
        if self.a.abs() <= f64::EPSILON {
            let t = -c / (2.0 * half_b);
            return [t, t];
        }
        let sqrtd = self.discriminant.sqrt();
        let t0 = (-half_b - sqrtd) / self.a;
        let t1 = (-half_b + sqrtd) / self.a;
        if t0 <= t1 { [t0, t1] } else { [t1, t0] }
    }
}

/// Linear-stage sphere coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCoeffs {
    /// `pos · center`
    pub pc: f64,
    /// `center · center - radius²`
    pub c2: f64,
}

impl SphereCoeffs {
    /// Coefficients that are affine in `pos`.
    pub fn linear(center: DVec3, radius: f64, pos: DVec3) -> Self {
        Self {
            pc: pos.dot(center),
            c2: center.length_squared() - radius * radius,
        }
    }

    /// Per-sample terms for the fragment at `pos`.
    pub fn nonlinear(&self, pos: DVec3) -> NonlinearCoeffs {
        let a = pos.length_squared();
        NonlinearCoeffs {
            a,
            discriminant: self.pc * self.pc - a * self.c2,
        }
    }

    /// Roots of `a t² - 2 pc t + c2 = 0` in ascending order.
    pub fn roots(&self, q: &NonlinearCoeffs) -> [f64; 2] {
        q.roots(-self.pc, self.c2)
    }
}

/// Linear-stage cone coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeCoeffs {
    /// `pos · axis_hat`
    pub pa: f64,
    /// Half the linear coefficient of the ray quadratic
    pub half_b: f64,
    /// Constant term of the ray quadratic
    pub c: f64,
    /// `1 + taper²`
    pub taper_factor: f64,
}

impl ConeCoeffs {
    /// Coefficients that are affine in `pos`.
    ///
    /// With `h` the signed axial distance from `center`, the surface is
    /// `|x - center|² - h² = (radius - taper h)²`.
    pub fn linear(center: DVec3, radius: f64, axis_hat: DVec3, taper: f64, pos: DVec3) -> Self {
        let ca = center.dot(axis_hat);
        let r0 = radius + taper * ca;
        let pa = pos.dot(axis_hat);
        Self {
            pa,
            half_b: pa * (ca + taper * r0) - pos.dot(center),
            c: center.length_squared() - ca * ca - r0 * r0,
            taper_factor: 1.0 + taper * taper,
        }
    }

    /// Per-sample terms for the fragment at `pos`.
    pub fn nonlinear(&self, pos: DVec3) -> NonlinearCoeffs {
        let a = pos.length_squared() - self.taper_factor * self.pa * self.pa;
        NonlinearCoeffs {
            a,
            discriminant: self.half_b * self.half_b - a * self.c,
        }
    }

    /// Roots of the ray quadratic in ascending order.
    pub fn roots(&self, q: &NonlinearCoeffs) -> [f64; 2] {
        q.roots(self.half_b, self.c)
    }
}

/// Resolve one sample of an imposter.
///
/// Returns `None` when the sample must be discarded: the ray misses the
/// surface, only meets it behind the origin or outside the cone segment,
/// or the hit falls outside the depth range.
pub fn resolve_surface_sample(
    params: &ImposterParams,
    ray: &Ray,
    projection: &Projection,
) -> Option<SurfaceHit> {
    let (t, normal) = match *params {
        ImposterParams::Sphere { center, radius } => resolve_sphere(center, radius, ray)?,
        ImposterParams::Cone {
            center,
            radius,
            axis,
            taper,
        } => resolve_cone(center, radius, axis, taper, ray)?,
    };

    let point = ray.at(t);
    let depth = projection.depth(point);
    if !Interval::DEPTH.contains(depth) {
        return None;
    }

    Some(SurfaceHit {
        t,
        point,
        normal,
        depth,
    })
}

fn resolve_sphere(center: DVec3, radius: f64, ray: &Ray) -> Option<(f64, DVec3)> {
    let pos = ray.direction;
    let coeffs = SphereCoeffs::linear(center - ray.origin, radius, pos);
    let q = coeffs.nonlinear(pos);
    if q.misses() {
        return None;
    }

    // Nearest root in front of the eye
    let t = coeffs
        .roots(&q)
        .into_iter()
        .find(|&t| Interval::FORWARD.surrounds(t))?;
    let normal = (ray.at(t) - center) / radius;
    Some((t, normal))
}

fn resolve_cone(
    center: DVec3,
    radius: f64,
    axis: DVec3,
    taper: f64,
    ray: &Ray,
) -> Option<(f64, DVec3)> {
    let half_length = axis.length();
    let axis_hat = axis.try_normalize()?;
    let pos = ray.direction;
    let coeffs = ConeCoeffs::linear(center - ray.origin, radius, axis_hat, taper, pos);
    let q = coeffs.nonlinear(pos);
    if q.misses() {
        return None;
    }

    // The quadratic describes an infinite double cone; keep the nearest
    // forward root that lies on the segment itself
    let segment = Interval::centered(half_length);
    coeffs.roots(&q).into_iter().find_map(|t| {
        if !Interval::FORWARD.surrounds(t) {
            return None;
        }
        let offset = ray.at(t) - center;
        let h = offset.dot(axis_hat);
        let r = radius - taper * h;
        if !segment.contains(h) || r < 0.0 {
            return None;
        }
        let radial = offset - h * axis_hat;
        let normal = (radial + taper * r * axis_hat)
            .try_normalize()
            .unwrap_or(axis_hat);
        Some((t, normal))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cone::ConeSegment;
    use crate::sphere::Sphere;

    const EPS: f64 = 1e-6;

    fn projection() -> Projection {
        Projection::new(45.0, 640.0 / 480.0, 0.1, 100.0)
    }

    /// Window depth of an eye-space z under the projection above.
    fn expected_depth(z: f64) -> f64 {
        let (n, f) = (0.1, 100.0);
        let clip_z = -(f + n) / (f - n) * z - 2.0 * f * n / (f - n);
        let clip_w = -z;
        0.5 * clip_z / clip_w + 0.5
    }

    fn cone_params(a: Sphere, b: Sphere) -> (ConeSegment, ImposterParams) {
        let cone = ConeSegment::new(&a, &b).unwrap();
        (cone, ImposterParams::from(&Imposter::Cone(cone)))
    }

    #[test]
    fn test_sphere_hit_on_axis() {
        let params = ImposterParams::Sphere {
            center: DVec3::new(0.0, 0.0, -5.0),
            radius: 2.0,
        };
        let hit = resolve_surface_sample(&params, &Ray::through(DVec3::new(0.0, 0.0, -1.0)), &projection())
            .expect("ray along -z must hit");
        assert!((hit.point - DVec3::new(0.0, 0.0, -3.0)).length() < EPS);
        assert!((hit.normal - DVec3::Z).length() < EPS);
        assert!((hit.depth - expected_depth(-3.0)).abs() < EPS);
    }

    #[test]
    fn test_sphere_round_trip_through_known_point() {
        let center = DVec3::new(0.4, -0.3, -6.0);
        let radius = 1.3;
        let n = DVec3::new(0.3, 0.4, 0.8).normalize();
        let p = center + radius * n;
        let params = ImposterParams::Sphere { center, radius };

        // Any point along the eye ray through p works as the fragment position
        for scale in [0.1, 1.0, 7.5] {
            let hit = resolve_surface_sample(&params, &Ray::through(p * scale), &projection())
                .expect("ray through a visible surface point must hit");
            assert!((hit.point - p).length() < EPS);
            assert!((hit.normal - (p - center) / radius).length() < EPS);
            assert!((hit.depth - expected_depth(p.z)).abs() < EPS);
        }
    }

    #[test]
    fn test_sphere_centered_at_ray_origin_frame() {
        // Sphere at the origin, viewed along -z from an offset ray origin.
        let params = ImposterParams::Sphere {
            center: DVec3::ZERO,
            radius: 1.0,
        };
        let ray = Ray::new(DVec3::new(0.3, 0.2, 5.0), DVec3::new(0.0, 0.0, -1.0));
        let (t, normal) = match params {
            ImposterParams::Sphere { center, radius } => resolve_sphere(center, radius, &ray).unwrap(),
            _ => unreachable!(),
        };
        let p = DVec3::new(0.3, 0.2, (1.0f64 - 0.13).sqrt());
        assert!((ray.at(t) - p).length() < EPS);
        assert!((normal - p).length() < EPS);
    }

    #[test]
    fn test_sphere_miss_is_discarded() {
        let params = ImposterParams::Sphere {
            center: DVec3::new(0.0, 0.0, -5.0),
            radius: 1.0,
        };
        // The first two pass too far from the center; the last meets the
        // sphere only behind the eye
        for dir in [DVec3::new(0.0, 0.5, -1.0), DVec3::new(-1.0, 0.0, -1.0), DVec3::new(0.0, 0.0, 1.0)] {
            assert_eq!(resolve_surface_sample(&params, &Ray::through(dir), &projection()), None);
        }
    }

    #[test]
    fn test_sphere_beyond_far_plane_is_clipped() {
        let params = ImposterParams::Sphere {
            center: DVec3::new(0.0, 0.0, -150.0),
            radius: 1.0,
        };
        let ray = Ray::through(DVec3::new(0.0, 0.0, -1.0));
        assert_eq!(resolve_surface_sample(&params, &ray, &projection()), None);
    }

    #[test]
    fn test_linear_coefficients_interpolate() {
        let center = DVec3::new(0.5, 1.0, -4.0);
        let axis_hat = DVec3::new(1.0, 2.0, -0.5).normalize();
        let p0 = DVec3::new(-0.2, 0.8, -3.0);
        let p1 = DVec3::new(0.9, 1.4, -3.5);
        let mid = 0.5 * (p0 + p1);

        let s0 = SphereCoeffs::linear(center, 0.7, p0);
        let s1 = SphereCoeffs::linear(center, 0.7, p1);
        let sm = SphereCoeffs::linear(center, 0.7, mid);
        assert!((sm.pc - 0.5 * (s0.pc + s1.pc)).abs() < 1e-12);
        assert_eq!(sm.c2, s0.c2);

        let c0 = ConeCoeffs::linear(center, 0.7, axis_hat, 0.2, p0);
        let c1 = ConeCoeffs::linear(center, 0.7, axis_hat, 0.2, p1);
        let cm = ConeCoeffs::linear(center, 0.7, axis_hat, 0.2, mid);
        assert!((cm.pa - 0.5 * (c0.pa + c1.pa)).abs() < 1e-12);
        assert!((cm.half_b - 0.5 * (c0.half_b + c1.half_b)).abs() < 1e-12);
        assert_eq!(cm.c, c0.c);
    }

    #[test]
    fn test_cylinder_hit() {
        let (_, params) = cone_params(
            Sphere::new([-1.0, 0.0, -5.0], 1.0),
            Sphere::new([1.0, 0.0, -5.0], 1.0),
        );
        let hit = resolve_surface_sample(&params, &Ray::through(DVec3::new(0.0, 0.0, -1.0)), &projection())
            .expect("ray through the middle of the cylinder must hit");
        assert!((hit.point - DVec3::new(0.0, 0.0, -4.0)).length() < EPS);
        assert!((hit.normal - DVec3::Z).length() < EPS);
        assert!((hit.depth - expected_depth(-4.0)).abs() < EPS);
    }

    #[test]
    fn test_tapered_cone_hit_lies_on_surface() {
        let (cone, params) = cone_params(
            Sphere::new([-1.0, 0.2, -6.0], 0.8),
            Sphere::new([1.2, 0.5, -6.5], 0.3),
        );
        let axis_hat = DVec3::from(cone.axis_direction());
        let center = DVec3::from(cone.center());

        for x in [-0.6, -0.2, 0.0, 0.3, 0.7] {
            let dir = DVec3::new(x, 0.3, -6.0);
            let hit = resolve_surface_sample(&params, &Ray::through(dir), &projection())
                .unwrap_or_else(|| panic!("ray at x = {} must hit", x));

            let offset = hit.point - center;
            let h = offset.dot(axis_hat);
            let radial = offset - h * axis_hat;
            assert!(h.abs() <= cone.length() / 2.0 + EPS);
            assert!((radial.length() - cone.radius_at(h)).abs() < EPS);

            // Normal is perpendicular to the surface line through the hit
            let generator = axis_hat - cone.taper() * radial.normalize();
            assert!(hit.normal.dot(generator).abs() < EPS);
            assert!((hit.normal.length() - 1.0).abs() < EPS);
            // and faces the eye
            assert!(hit.normal.dot(-hit.point) > 0.0);
        }
    }

    #[test]
    fn test_cone_miss_is_discarded() {
        let (_, params) = cone_params(
            Sphere::new([-1.0, 0.0, -5.0], 1.0),
            Sphere::new([1.0, 0.0, -5.0], 1.0),
        );
        // Passes the infinite cylinder beyond the segment end
        let beyond_end = Ray::through(DVec3::new(3.0, 0.0, -5.0));
        // Closest approach to the axis exceeds the radius
        let above = Ray::through(DVec3::new(0.0, 3.0, -5.0));
        assert_eq!(resolve_surface_sample(&params, &beyond_end, &projection()), None);
        assert_eq!(resolve_surface_sample(&params, &above, &projection()), None);
    }

    #[test]
    fn test_degenerate_axis_is_discarded() {
        let params = ImposterParams::Cone {
            center: DVec3::new(0.0, 0.0, -5.0),
            radius: 1.0,
            axis: DVec3::ZERO,
            taper: 0.0,
        };
        let ray = Ray::through(DVec3::new(0.0, 0.0, -1.0));
        assert_eq!(resolve_surface_sample(&params, &ray, &projection()), None);
    }
}
