//! Bounding geometry for imposter primitives.
//!
//! Each primitive is enclosed by a box drawn as two triangle strips of eight
//! vertices (bottom/front/top, then left/back/right). The vertices do not
//! carry their final positions. Instead they encode the analytic primitive
//! so a later per-fragment stage can rebuild it:
//!
//! - `position`: primitive center (xyz) and central radius (w), identical on
//!   every vertex of the primitive
//! - `normal`: offset of this box corner from the center; the drawn corner
//!   is `position.xyz + normal`
//! - `aux`: cone axis (xyz) and taper (w); zero for spheres
//!
//! The layout is `#[repr(C)]` and [`Pod`] so a [`BoundingGeometry`] can be
//! handed to a vertex buffer without conversion.

use bytemuck::{Pod, Zeroable};
use glam::DVec3;
use log::trace;

use crate::cone::ConeSegment;
use crate::imposter::Imposter;
use crate::resolver::ImposterParams;
use crate::sphere::Sphere;
use crate::vec3::Vec3;

/// Number of vertices in one strip.
pub const STRIP_LEN: usize = 8;

/// Unit-cube corners of the two strips, in draw order.
///
/// The first strip covers the bottom, front and top faces; the second the
/// left, back and right faces. Together they close the cube.
pub const STRIP_CORNERS: [[[f64; 3]; STRIP_LEN]; 2] = [
    [
        [-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], // bottom
        [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], // front
        [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], // top
    ],
    [
        [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], // left
        [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], // back
        [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], // right
    ],
];

/// One bounding-box corner with its encoded primitive parameters.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BoundingVertex {
    /// Primitive center (xyz) and central radius (w)
    pub position: [f32; 4],
    /// Corner offset from the center
    pub normal: [f32; 3],
    /// Cone axis (xyz) and taper (w)
    pub aux: [f32; 4],
}

impl BoundingVertex {
    /// Actual corner location, `position.xyz + normal`.
    pub fn corner(&self) -> DVec3 {
        let [x, y, z, _] = self.position;
        DVec3::new(x as f64, y as f64, z as f64) + DVec3::from(self.normal.map(|c| c as f64))
    }
}

/// Which analytic surface a [`BoundingGeometry`] encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// Vertices encode a sphere.
    Sphere,
    /// Vertices encode a cone segment.
    Cone,
}

/// Two eight-vertex triangle strips enclosing one primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingGeometry {
    kind: PrimitiveKind,
    strips: [[BoundingVertex; STRIP_LEN]; 2],
}

impl BoundingGeometry {
    /// Kind of primitive the vertices encode.
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// The two strips in draw order.
    pub fn strips(&self) -> &[[BoundingVertex; STRIP_LEN]; 2] {
        &self.strips
    }

    /// All sixteen vertices, first strip first.
    pub fn vertices(&self) -> impl Iterator<Item = &BoundingVertex> + '_ {
        self.strips.iter().flatten()
    }

    /// Triangles the strips rasterise to, six per strip.
    ///
    /// Winding alternates along a strip exactly as it would on the GPU.
    pub fn triangles(&self) -> impl Iterator<Item = [BoundingVertex; 3]> + '_ {
        self.strips
            .iter()
            .flat_map(|strip| strip.windows(3).map(|w| [w[0], w[1], w[2]]))
    }

    /// Raw vertex data, ready for upload as a vertex buffer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.strips.as_slice())
    }

    /// Decode the primitive parameters carried by the vertex channels.
    ///
    /// All vertices carry the same parameters, so the first one is used.
    pub fn params(&self) -> ImposterParams {
        let v = &self.strips[0][0];
        let [x, y, z, radius] = v.position.map(|c| c as f64);
        let center = DVec3::new(x, y, z);
        match self.kind {
            PrimitiveKind::Sphere => ImposterParams::Sphere { center, radius },
            PrimitiveKind::Cone => {
                let [ax, ay, az, taper] = v.aux.map(|c| c as f64);
                ImposterParams::Cone {
                    center,
                    radius,
                    axis: DVec3::new(ax, ay, az),
                    taper,
                }
            }
        }
    }
}

/// Emit the bounding strips for a primitive.
///
/// Pure function of the primitive's fields.
pub fn emit_bounding_geometry(imposter: &Imposter) -> BoundingGeometry {
    trace!("Emitting bounding geometry for {}", imposter.kind());
    match imposter {
        Imposter::Sphere(sphere) => emit_sphere(sphere),
        Imposter::Cone(cone) => emit_cone(cone),
    }
}

fn emit_sphere(sphere: &Sphere) -> BoundingGeometry {
    let [x, y, z] = sphere.center.to_f32_array();
    let position = [x, y, z, sphere.radius as f32];
    let strips = STRIP_CORNERS.map(|strip| {
        strip.map(|corner| BoundingVertex {
            position,
            normal: Vec3::from(corner).scale(sphere.radius).to_f32_array(),
            aux: [0.0; 4],
        })
    });
    BoundingGeometry {
        kind: PrimitiveKind::Sphere,
        strips,
    }
}

fn emit_cone(cone: &ConeSegment) -> BoundingGeometry {
    let half_length = cone.length() / 2.0;
    let (x_hat, y_hat, z_hat) = cone_frame(cone);

    let [x, y, z] = cone.center().to_f32_array();
    let position = [x, y, z, cone.radius() as f32];
    let [ax, ay, az] = cone.axis().to_f32_array();
    let aux = [ax, ay, az, cone.taper() as f32];

    let strips = STRIP_CORNERS.map(|strip| {
        strip.map(|[cx, cy, cz]| {
            // +X end of the box is the smaller end of the cone
            let r = if cx > 0.0 { cone.r1() } else { cone.r2() };
            let offset = x_hat
                .scale(cx * half_length)
                .add(y_hat.scale(cy * r))
                .add(z_hat.scale(cz * r));
            BoundingVertex {
                position,
                normal: offset.to_f32_array(),
                aux,
            }
        })
    });
    BoundingGeometry {
        kind: PrimitiveKind::Cone,
        strips,
    }
}

/// Orthonormal frame with X along the cone axis.
fn cone_frame(cone: &ConeSegment) -> (Vec3, Vec3, Vec3) {
    let x_hat = cone.axis_direction();
    // Of two candidate perpendiculars keep the longer, so an axis nearly
    // parallel to one candidate does not yield a tiny, noisy vector
    let y1 = x_hat.cross(Vec3::X);
    let y2 = x_hat.cross(Vec3::Z);
    let y = if y1.norm_squared() >= y2.norm_squared() { y1 } else { y2 };
    let y_hat = y.scale(y.norm().recip());
    let z_hat = x_hat.cross(y_hat);
    (x_hat, y_hat, z_hat)
}
