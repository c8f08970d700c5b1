//! Lighting for resolved imposter samples.
//!
//! One directional light in eye space with ambient, diffuse and specular
//! terms. The surface color drives both the ambient and diffuse material
//! response; specular highlights are white. Three rigs are available,
//! matching the demo's full, diffuse-only and ambient-only setups.

use glam::{DVec3, Vec3A};

/// RGB color type using Vec3A for SIMD optimization.
pub type Color = Vec3A;

/// Which light terms are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightingMode {
    /// Ambient, diffuse and specular.
    #[default]
    Full,
    /// Diffuse only, no light ambient and no highlight.
    DiffuseOnly,
    /// Ambient only; surfaces look flat.
    AmbientOnly,
}

/// Global ambient term that applies whatever the light settings are.
const SCENE_AMBIENT: f32 = 0.2;

/// Directional light plus material response.
#[derive(Debug, Clone, Copy)]
pub struct LightRig {
    /// Unit vector from the surface toward the light
    direction: DVec3,
    ambient: f32,
    diffuse: f32,
    specular: f32,
    material_specular: f32,
    shininess: i32,
}

impl LightRig {
    /// Light at eye-space direction (-5, 3, 3) configured for `mode`.
    pub fn new(mode: LightingMode) -> Self {
        let (ambient, diffuse, specular, material_specular) = match mode {
            LightingMode::Full => (0.2, 0.8, 0.8, 0.8),
            LightingMode::DiffuseOnly => (0.0, 0.8, 0.0, 0.0),
            LightingMode::AmbientOnly => (0.2, 0.0, 0.0, 0.0),
        };
        Self {
            direction: DVec3::new(-5.0, 3.0, 3.0).normalize(),
            ambient,
            diffuse,
            specular,
            material_specular,
            shininess: 150,
        }
    }

    /// Shade a surface sample with an eye-space `normal`.
    ///
    /// Highlights use an infinite viewer looking down -Z, so they depend on
    /// the normal alone.
    pub fn shade(&self, normal: DVec3, color: Color) -> Color {
        let n = normal.normalize_or_zero();
        let n_dot_l = n.dot(self.direction).max(0.0) as f32;

        let mut out = color * (SCENE_AMBIENT + self.ambient);
        out += color * (self.diffuse * n_dot_l);

        if n_dot_l > 0.0 && self.specular > 0.0 {
            let half = (self.direction + DVec3::Z).normalize_or_zero();
            let n_dot_h = n.dot(half).max(0.0) as f32;
            out += Color::splat(self.specular * self.material_specular * n_dot_h.powi(self.shininess));
        }

        out
    }
}

impl Default for LightRig {
    fn default() -> Self {
        Self::new(LightingMode::default())
    }
}
