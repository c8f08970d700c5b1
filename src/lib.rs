//! Imposter rendering of spheres and tapered cones
//!
//! Each primitive is drawn through a cube of flat bounding geometry whose
//! vertices carry the analytic parameters. A per-sample resolver ray-casts
//! the true surface, producing exact silhouettes, normals and depth.
//! Includes a parallel CPU renderer and a demo scene.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod bounding;
pub mod camera;
pub mod cone;
pub mod error;
pub mod imposter;
pub mod interval;
pub mod light;
pub mod random;
pub mod ray;
pub mod resolver;
pub mod scene;
pub mod sphere;
pub mod vec3;
