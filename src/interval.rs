//! Interval arithmetic for ray parameter and depth ranges.
//!
//! Provides closed intervals [min, max] used for ray t-values, axial extents
//! and window depth bounds.

/// Closed interval [min, max] for range checking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Minimum value of the interval
    pub min: f64,
    /// Maximum value of the interval
    pub max: f64,
}

impl Interval {
    /// Create a new interval with given min and max values
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Symmetric interval [-half_width, half_width]
    pub fn centered(half_width: f64) -> Self {
        Self::new(-half_width, half_width)
    }

    /// Check if the interval contains the given value (inclusive bounds)
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Check if the interval surrounds the given value (exclusive bounds)
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }
}

/// Commonly used interval constants
impl Interval {
    /// Ray parameters strictly in front of the origin
    pub const FORWARD: Interval = Interval {
        min: 0.0,
        max: f64::INFINITY,
    };

    /// Window-space depth range, as set by the default `glDepthRange`
    pub const DEPTH: Interval = Interval { min: 0.0, max: 1.0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        assert!(Interval::DEPTH.contains(0.0));
        assert!(Interval::DEPTH.contains(1.0));
        assert!(!Interval::DEPTH.contains(1.0001));
    }

    #[test]
    fn test_surrounds_is_exclusive() {
        assert!(!Interval::FORWARD.surrounds(0.0));
        assert!(Interval::FORWARD.surrounds(1e-9));
        assert!(Interval::centered(2.0).surrounds(-1.9));
    }
}
