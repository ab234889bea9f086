//! Axis-aligned bounding box.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in 3D space.
///
/// An empty box has `min > max` on every axis and absorbs the first point
/// included into it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// Create an empty bounding box.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::MAX, f64::MAX, f64::MAX),
            max: Point3::new(f64::MIN, f64::MIN, f64::MIN),
        }
    }

    /// Create a bounding box from explicit corners.
    #[must_use]
    pub const fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Build the bounding box of a set of points.
    pub fn from_points(points: impl IntoIterator<Item = Point3<f64>>) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.include(p);
        }
        aabb
    }

    /// Whether the box contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow the box to include a point.
    pub fn include(&mut self, p: Point3<f64>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Center of the box.
    ///
    /// Meaningless for an empty box; callers should check [`Self::is_empty`].
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Diagonal extent of the box, zero when empty.
    #[must_use]
    pub fn extent(&self) -> nalgebra::Vector3<f64> {
        if self.is_empty() {
            nalgebra::Vector3::zeros()
        } else {
            self.max - self.min
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_box_is_empty() {
        assert!(Aabb::empty().is_empty());
        assert!(Aabb::default().is_empty());
    }

    #[test]
    fn include_grows_box() {
        let mut aabb = Aabb::empty();
        aabb.include(Point3::new(1.0, 2.0, 3.0));
        aabb.include(Point3::new(-1.0, 0.0, 5.0));

        assert!(!aabb.is_empty());
        assert_relative_eq!(aabb.min.x, -1.0);
        assert_relative_eq!(aabb.max.z, 5.0);
    }

    #[test]
    fn center_of_unit_box() {
        let aabb = Aabb::from_points([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
        ]);
        let c = aabb.center();
        assert_relative_eq!(c.x, 0.5);
        assert_relative_eq!(c.y, 0.5);
        assert_relative_eq!(c.z, 0.5);
    }

    #[test]
    fn extent_of_empty_box_is_zero() {
        assert_relative_eq!(Aabb::empty().extent().norm(), 0.0);
    }
}
