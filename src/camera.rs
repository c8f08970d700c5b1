//! Perspective projection and the CPU imposter renderer
//!
//! The renderer does in software what a GPU would do with the imposter
//! pipeline: it rasterises each primitive's bounding strips, runs the
//! surface resolver for every covered sample, depth-tests the resolved
//! hits and lights the winner.

use glam::{DMat4, DVec2, DVec3};
use image::{ImageBuffer, Luma, Rgb};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use crate::bounding::emit_bounding_geometry;
use crate::light::{Color, LightRig};
use crate::random;
use crate::ray::Ray;
use crate::resolver::{resolve_surface_sample, ImposterParams, SurfaceHit};
use crate::scene::Scene;

/// Color painted where bounding geometry is covered but the surface is missed.
const BOUNDS_DEBUG_COLOR: Color = Color::new(0.0, 1.0, 0.0);

/// OpenGL-style perspective projection (eye looks down -Z).
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    matrix: DMat4,
    /// tan(fovy / 2)
    tan_half_fovy: f64,
    aspect: f64,
}

impl Projection {
    /// Same parameters as `gluPerspective`.
    pub fn new(fovy_degrees: f64, aspect: f64, near: f64, far: f64) -> Self {
        let fovy = fovy_degrees.to_radians();
        Self {
            matrix: DMat4::perspective_rh_gl(fovy, aspect, near, far),
            tan_half_fovy: (fovy / 2.0).tan(),
            aspect,
        }
    }

    /// Normalized device coordinates of an eye-space point.
    ///
    /// `None` for points at or behind the eye plane.
    pub fn project(&self, eye: DVec3) -> Option<DVec3> {
        let clip = self.matrix * eye.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }

    /// Window-space depth of an eye-space point, 0 at the near plane and 1
    /// at the far plane. Points behind the eye map to infinity.
    pub fn depth(&self, eye: DVec3) -> f64 {
        match self.project(eye) {
            Some(ndc) => 0.5 * ndc.z + 0.5,
            None => f64::INFINITY,
        }
    }

    /// Eye-space direction through a point given in normalized device
    /// coordinates.
    pub fn eye_direction(&self, ndc_x: f64, ndc_y: f64) -> DVec3 {
        DVec3::new(
            ndc_x * self.tan_half_fovy * self.aspect,
            ndc_y * self.tan_half_fovy,
            -1.0,
        )
    }
}

/// Rendered color and depth buffers.
pub struct Frame {
    /// Linear RGB color
    pub color: ImageBuffer<Rgb<f32>, Vec<f32>>,
    /// Window-space depth, 1.0 where nothing was drawn
    pub depth: ImageBuffer<Luma<f32>, Vec<f32>>,
}

/// Camera and renderer settings.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Rendered image width in pixel count
    pub image_width: u32,
    /// Rendered image height in pixel count
    pub image_height: u32,
    /// Number of jittered samples for each pixel (for anti-aliasing)
    pub samples_per_pixel: u32,
    /// Vertical field of view in degrees
    pub vfov: f64,
    /// Near clipping distance
    pub near: f64,
    /// Far clipping distance
    pub far: f64,
    /// Clear color
    pub background: Color,
    /// Lighting applied to resolved samples
    pub light: LightRig,
    /// Paint covered-but-discarded samples green
    pub show_bounds: bool,
}

/// A primitive ready for rasterisation.
struct Prepared {
    params: ImposterParams,
    color: Color,
    coverage: Coverage,
}

/// Screen-space footprint of a primitive's bounding geometry.
enum Coverage {
    /// Bounding geometry crosses the eye plane; test every sample.
    Everywhere,
    /// Projected triangles plus their bounding rectangle.
    Triangles {
        min: DVec2,
        max: DVec2,
        triangles: Vec<[DVec2; 3]>,
    },
}

impl Coverage {
    fn contains(&self, p: DVec2) -> bool {
        match self {
            Coverage::Everywhere => true,
            Coverage::Triangles { min, max, triangles } => {
                p.x >= min.x
                    && p.y >= min.y
                    && p.x <= max.x
                    && p.y <= max.y
                    && triangles.iter().any(|tri| triangle_contains(tri, p))
            }
        }
    }
}

/// Point-in-triangle test accepting either winding.
fn triangle_contains(tri: &[DVec2; 3], p: DVec2) -> bool {
    let edge = |a: DVec2, b: DVec2| (b - a).perp_dot(p - a);
    let area = (tri[1] - tri[0]).perp_dot(tri[2] - tri[0]);
    if area == 0.0 {
        return false;
    }
    let e0 = edge(tri[0], tri[1]);
    let e1 = edge(tri[1], tri[2]);
    let e2 = edge(tri[2], tri[0]);
    if area > 0.0 {
        e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0
    } else {
        e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0
    }
}

/// Row-major buffer index of pixel (x, y), computed in `usize`.
fn pixel_index(x: u32, y: u32, width: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// Inverse of [`pixel_index`].
fn pixel_coords(index: usize, width: u32) -> (u32, u32) {
    let width = width as usize;
    ((index % width) as u32, (index / width) as u32)
}

impl Camera {
    /// Creates a new camera with default settings.
    ///
    /// Default: 640x480 image, 4 samples per pixel, 45° FOV, clipping planes
    /// at 0.1 and 100, grey background, full light rig.
    pub fn new() -> Self {
        Self {
            image_width: 640,
            image_height: 480,
            samples_per_pixel: 4,
            vfov: 45.0,
            near: 0.1,
            far: 100.0,
            background: Color::splat(0.5),
            light: LightRig::default(),
            show_bounds: false,
        }
    }

    /// Projection for the current image size.
    pub fn projection(&self) -> Projection {
        let height = self.image_height.max(1);
        let aspect = self.image_width as f64 / height as f64;
        Projection::new(self.vfov, aspect, self.near, self.far)
    }

    /// Renders an eye-space scene.
    ///
    /// Pixels are processed in parallel; each sample is resolved
    /// independently of every other.
    pub fn render(&self, scene: &Scene) -> Frame {
        let width = self.image_width.max(1);
        let height = self.image_height.max(1);
        let projection = self.projection();
        let prepared = self.prepare(scene, &projection);

        info!("Rendering {} imposters using {} CPU cores...", prepared.len(), rayon::current_num_threads());
        let generation_start = std::time::Instant::now();
        let pixel_count = width as usize * height as usize;
        let pb = ProgressBar::new(pixel_count as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40} {pos}/{len} ETA: {eta}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let pixels: Vec<(Color, f32)> = (0..pixel_count)
            .into_par_iter()
            .map(|index| {
                let (i, j) = pixel_coords(index, width);
                let pixel = self.shade_pixel(i, j, &prepared, &projection);
                pb.inc(1);
                pixel
            })
            .collect();

        pb.finish();
        info!("Image generated in {:.2?}", generation_start.elapsed());

        let at = |x: u32, y: u32| pixels[pixel_index(x, y, width)];
        let color = ImageBuffer::from_fn(width, height, |x, y| {
            let c = at(x, y).0;
            Rgb([c.x, c.y, c.z])
        });
        let depth = ImageBuffer::from_fn(width, height, |x, y| Luma([at(x, y).1]));
        Frame { color, depth }
    }

    /// Emit and project bounding geometry for every primitive.
    fn prepare(&self, scene: &Scene, projection: &Projection) -> Vec<Prepared> {
        let (width, height) = (self.image_width.max(1) as f64, self.image_height.max(1) as f64);
        let to_screen = |ndc: DVec3| DVec2::new((ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height);

        scene
            .items
            .iter()
            .map(|item| {
                let geometry = emit_bounding_geometry(&item.imposter);
                let projected: Option<Vec<[DVec2; 3]>> = geometry
                    .triangles()
                    .map(|tri| {
                        let mut screen = [DVec2::ZERO; 3];
                        for (out, v) in screen.iter_mut().zip(tri.iter()) {
                            *out = to_screen(projection.project(v.corner())?);
                        }
                        Some(screen)
                    })
                    .collect();

                let coverage = match projected {
                    Some(triangles) => {
                        let points = triangles.iter().flatten();
                        let min = points.clone().fold(DVec2::splat(f64::INFINITY), |m, p| m.min(*p));
                        let max = points.fold(DVec2::splat(f64::NEG_INFINITY), |m, p| m.max(*p));
                        Coverage::Triangles { min, max, triangles }
                    }
                    None => Coverage::Everywhere,
                };
                if let Coverage::Triangles { min, max, .. } = &coverage {
                    debug!("{} imposter covers screen rect {:?}..{:?}", item.imposter.kind(), min, max);
                } else {
                    debug!("{} imposter crosses the eye plane", item.imposter.kind());
                }

                Prepared {
                    params: geometry.params(),
                    color: item.color,
                    coverage,
                }
            })
            .collect()
    }

    /// Resolve, depth-test and light all samples of one pixel.
    ///
    /// Returns the averaged color and the nearest depth.
    fn shade_pixel(&self, i: u32, j: u32, prepared: &[Prepared], projection: &Projection) -> (Color, f32) {
        let samples = self.samples_per_pixel.max(1);
        let (width, height) = (self.image_width.max(1) as f64, self.image_height.max(1) as f64);
        let mut pixel_color = Color::ZERO;
        let mut pixel_depth = 1.0f64;

        for _sample in 0..samples {
            let offset = self.sample_offset();
            let p = DVec2::new(i as f64 + offset.x, j as f64 + offset.y);
            let ray = Ray::through(projection.eye_direction(2.0 * p.x / width - 1.0, 1.0 - 2.0 * p.y / height));

            let mut nearest: Option<(SurfaceHit, Color)> = None;
            let mut covered = false;
            for primitive in prepared.iter().filter(|prim| prim.coverage.contains(p)) {
                covered = true;
                if let Some(hit) = resolve_surface_sample(&primitive.params, &ray, projection) {
                    if nearest.as_ref().map_or(true, |(best, _)| hit.depth < best.depth) {
                        nearest = Some((hit, primitive.color));
                    }
                }
            }

            pixel_color += match nearest {
                Some((hit, color)) => {
                    pixel_depth = pixel_depth.min(hit.depth);
                    self.light.shade(hit.normal, color)
                }
                None if covered && self.show_bounds => BOUNDS_DEBUG_COLOR,
                None => self.background,
            };
        }

        (pixel_color / samples as f32, pixel_depth as f32)
    }

    /// Sample position within the pixel: the center for a single sample,
    /// otherwise uniformly jittered.
    fn sample_offset(&self) -> DVec2 {
        if self.samples_per_pixel <= 1 {
            DVec2::splat(0.5)
        } else {
            DVec2::new(random::random_f64(), random::random_f64())
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imposter::Imposter;
    use crate::sphere::Sphere;

    #[test]
    fn test_depth_spans_clip_range() {
        let projection = Projection::new(45.0, 1.0, 0.1, 100.0);
        assert!((projection.depth(DVec3::new(0.0, 0.0, -0.1)) - 0.0).abs() < 1e-9);
        assert!((projection.depth(DVec3::new(0.0, 0.0, -100.0)) - 1.0).abs() < 1e-9);
        assert!(projection.depth(DVec3::new(0.0, 0.0, 1.0)).is_infinite());
    }

    #[test]
    fn test_eye_direction_projects_back_to_ndc() {
        let projection = Projection::new(45.0, 4.0 / 3.0, 0.1, 100.0);
        for (x, y) in [(0.0, 0.0), (0.5, -0.25), (-1.0, 1.0)] {
            let dir = projection.eye_direction(x, y);
            let ndc = projection.project(dir * 3.0).unwrap();
            assert!((ndc.x - x).abs() < 1e-9);
            assert!((ndc.y - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_pixel_index_does_not_overflow_u32() {
        let (width, height) = (70_000u32, 70_000u32);
        let last = pixel_index(width - 1, height - 1, width);
        assert_eq!(last, 70_000usize * 70_000 - 1);
        assert_eq!(pixel_coords(last, width), (width - 1, height - 1));
        assert_eq!(pixel_coords(pixel_index(12, 34, 640), 640), (12, 34));
    }

    #[test]
    fn test_triangle_contains_either_winding() {
        let ccw = [DVec2::new(0.0, 0.0), DVec2::new(4.0, 0.0), DVec2::new(0.0, 4.0)];
        let cw = [ccw[0], ccw[2], ccw[1]];
        for tri in [ccw, cw] {
            assert!(triangle_contains(&tri, DVec2::new(1.0, 1.0)));
            assert!(!triangle_contains(&tri, DVec2::new(3.0, 3.0)));
        }
        let flat = [DVec2::ZERO, DVec2::ONE, DVec2::splat(2.0)];
        assert!(!triangle_contains(&flat, DVec2::ONE));
    }

    #[test]
    fn test_render_draws_sphere_over_background() {
        let mut scene = Scene::new();
        let orange = Color::new(0.8, 0.5, 0.2);
        scene.add(Imposter::Sphere(Sphere::new([0.0, 0.0, -6.0], 1.0)), orange);

        let mut camera = Camera::new();
        camera.image_width = 64;
        camera.image_height = 48;
        camera.samples_per_pixel = 1;
        let frame = camera.render(&scene);

        let center = frame.depth.get_pixel(32, 24)[0];
        let corner = frame.depth.get_pixel(0, 0)[0];
        assert!(center < 1.0, "sphere must be drawn at the image center");
        assert_eq!(corner, 1.0);
        assert_eq!(frame.color.get_pixel(0, 0).0, [0.5, 0.5, 0.5]);
        assert_ne!(frame.color.get_pixel(32, 24).0, [0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_nearer_primitive_wins_depth_test() {
        let near = Color::new(1.0, 0.0, 0.0);
        let far = Color::new(0.0, 0.0, 1.0);
        let mut scene = Scene::new();
        scene.add(Imposter::Sphere(Sphere::new([0.0, 0.0, -8.0], 1.5)), far);
        scene.add(Imposter::Sphere(Sphere::new([0.0, 0.0, -5.0], 0.5)), near);

        let mut camera = Camera::new();
        camera.image_width = 32;
        camera.image_height = 32;
        camera.samples_per_pixel = 1;
        camera.light = LightRig::new(crate::light::LightingMode::AmbientOnly);
        let frame = camera.render(&scene);

        let c = frame.color.get_pixel(16, 16).0;
        assert!(c[0] > 0.0 && c[2] == 0.0, "front sphere must hide the back one, got {:?}", c);
    }

    #[test]
    fn test_show_bounds_marks_discarded_samples() {
        let mut scene = Scene::new();
        scene.add(Imposter::Sphere(Sphere::new([0.0, 0.0, -6.0], 1.0)), Color::ONE);

        let mut camera = Camera::new();
        camera.image_width = 64;
        camera.image_height = 64;
        camera.samples_per_pixel = 1;
        camera.show_bounds = true;
        let frame = camera.render(&scene);

        let green = BOUNDS_DEBUG_COLOR;
        let has_green = frame.color.pixels().any(|p| p.0 == [green.x, green.y, green.z]);
        assert!(has_green, "cube corners outside the sphere must show as bounds");
    }
}
