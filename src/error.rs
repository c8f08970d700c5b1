//! Error types for imposter geometry construction.

use thiserror::Error;

/// Ill-defined geometric input.
///
/// Construction code returns these instead of letting NaN or infinities
/// leak into emitted vertex data.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    /// The two sphere centers are the same point, so no cone axis exists.
    #[error("sphere centers coincide; cone axis is undefined")]
    CoincidentCenters,

    /// One sphere contains the other (or touches it internally), so no
    /// cone can be tangent to both.
    #[error("no tangent cone exists between the spheres (sin alpha = {sin_alpha})")]
    NoTangentCone {
        /// Sine of the would-be cone half angle, `(rs2 - rs1) / d`.
        sin_alpha: f64,
    },

    /// Scalar division by zero.
    #[error("division of a vector by zero")]
    DivisionByZero,

    /// A vector was built from a slice that does not hold exactly three values.
    #[error("expected 3 vector components, got {len}")]
    Dimension {
        /// Number of components that were supplied.
        len: usize,
    },

    /// A coordinate or radius is NaN or infinite.
    #[error("geometry input is not finite")]
    NonFinite,
}
