//! Scene description: colored imposters in a shared coordinate frame.

use glam::{DAffine3, DVec3};
use log::{debug, warn};

use crate::cone::ConeSegment;
use crate::imposter::Imposter;
use crate::light::Color;
use crate::sphere::Sphere;

/// Distance from the eye to the demo scene's origin.
pub const SCENE_DISTANCE: f64 = 6.0;

/// A primitive with its surface color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneItem {
    /// Shape drawn through bounding geometry
    pub imposter: Imposter,
    /// Ambient and diffuse surface color
    pub color: Color,
}

/// Ordered list of scene items.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Items in draw order
    pub items: Vec<SceneItem>,
}

impl Scene {
    /// Empty scene.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a primitive.
    pub fn add(&mut self, imposter: impl Into<Imposter>, color: Color) {
        self.items.push(SceneItem {
            imposter: imposter.into(),
            color,
        });
    }

    /// The demo molecule-like scene: six spheres and one cone joining the
    /// two upper green spheres.
    pub fn demo() -> Self {
        let orange = Color::new(0.8, 0.5, 0.2);
        let blue = Color::new(0.2, 0.5, 0.8);
        let green = Color::new(0.1, 0.7, 0.1);

        let mut scene = Self::new();
        scene.add(Sphere::new([-1.6, 0.0, 0.0], 1.0), orange);
        scene.add(Sphere::new([0.0, -0.2, 0.0], 1.1), blue);
        scene.add(Sphere::new([-0.5, -1.2, 0.0], 0.8), green);

        let upper = Sphere::new([0.0, 1.1, 0.0], 1.0);
        let tip = Sphere::new([1.2, 1.5, 0.0], 0.2);
        scene.add(upper, green);
        scene.add(tip, green);
        match ConeSegment::new(&upper, &tip) {
            Ok(cone) => scene.add(cone, green),
            Err(e) => warn!("Skipping demo cone: {}", e),
        }

        scene.add(Sphere::new([1.6, 0.0, 0.0], 1.0), orange);
        debug!("Demo scene has {} items", scene.items.len());
        scene
    }

    /// Copy of the scene with every primitive moved by `model_view`.
    pub fn to_eye(&self, model_view: &DAffine3) -> Self {
        Self {
            items: self
                .items
                .iter()
                .map(|item| SceneItem {
                    imposter: item.imposter.transformed(model_view),
                    ..*item
                })
                .collect(),
        }
    }
}

/// Model-view transform of the demo: rotate about Y by `yrot_degrees`, then
/// push the scene `SCENE_DISTANCE` units in front of the eye.
pub fn model_view(yrot_degrees: f64) -> DAffine3 {
    DAffine3::from_translation(DVec3::new(0.0, 0.0, -SCENE_DISTANCE))
        * DAffine3::from_rotation_y(yrot_degrees.to_radians())
}
