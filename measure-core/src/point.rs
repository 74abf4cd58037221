//! Anchor positions.

use serde::{Deserialize, Serialize};

/// A position in metres.
///
/// Orientation of the surface that produced the point is not retained.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    /// X coordinate in metres.
    pub x: f64,
    /// Y coordinate in metres.
    pub y: f64,
    /// Z coordinate in metres.
    pub z: f64,
}

impl Point3 {
    /// Create a point from its coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    ///
    /// # Example
    ///
    /// ```
    /// use measure_core::Point3;
    ///
    /// let a = Point3::new(0.0, 0.0, 0.0);
    /// let b = Point3::new(3.0, 4.0, 0.0);
    /// assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// True when no coordinate is NaN or infinite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Coordinates as an array, the layout frontends expect.
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_is_symmetric() {
        let a = Point3::new(1.0, -2.0, 0.5);
        let b = Point3::new(-3.0, 4.0, 2.5);
        assert_relative_eq!(a.distance(&b), b.distance(&a));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let a = Point3::new(0.3, 0.7, -1.1);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn test_is_finite() {
        assert!(Point3::new(1.0, 2.0, 3.0).is_finite());
        assert!(!Point3::new(f64::NAN, 0.0, 0.0).is_finite());
        assert!(!Point3::new(0.0, f64::INFINITY, 0.0).is_finite());
    }

    #[test]
    fn test_from_array() {
        let p = Point3::from([1.0, 2.0, 3.0]);
        assert_eq!(p.to_array(), [1.0, 2.0, 3.0]);
    }
}
