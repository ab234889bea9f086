//! Region plane fitting and 2D projection.
//!
//! The wavefront runs in 2D. Each region is projected onto its best-fit
//! plane before shrinking, and new points are lifted back to 3D with the
//! inset height applied along the plane normal.

use nalgebra::{Point2, Point3, Vector3};

/// Orthonormal frame of a region's best-fit plane.
#[derive(Debug, Clone)]
pub(crate) struct RegionPlane {
    origin: Point3<f64>,
    u: Vector3<f64>,
    v: Vector3<f64>,
    normal: Vector3<f64>,
}

impl RegionPlane {
    /// Build a frame from an area-weighted normal and a point on the plane.
    ///
    /// Returns `None` for a zero-length normal.
    pub(crate) fn fit(normal: Vector3<f64>, origin: Point3<f64>) -> Option<Self> {
        if normal.norm() <= f64::EPSILON {
            return None;
        }
        let normal = normal.normalize();
        // Pick the world axis least aligned with the normal as the seed.
        let seed = if normal.x.abs() <= normal.y.abs() && normal.x.abs() <= normal.z.abs() {
            Vector3::x()
        } else if normal.y.abs() <= normal.z.abs() {
            Vector3::y()
        } else {
            Vector3::z()
        };
        let u = seed.cross(&normal).normalize();
        let v = normal.cross(&u);
        Some(Self {
            origin,
            u,
            v,
            normal,
        })
    }

    /// Project a 3D point into plane coordinates, dropping the out-of-plane
    /// component.
    pub(crate) fn project(&self, p: Point3<f64>) -> Point2<f64> {
        let rel = p - self.origin;
        Point2::new(rel.dot(&self.u), rel.dot(&self.v))
    }

    /// Lift a plane point back to 3D, raised by `z` along the plane normal.
    pub(crate) fn lift(&self, p: Point2<f64>, z: f64) -> Point3<f64> {
        self.origin + self.u * p.x + self.v * p.y + self.normal * z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn frame_is_orthonormal() {
        let plane = RegionPlane::fit(
            Vector3::new(0.3, -0.2, 0.9),
            Point3::new(1.0, 2.0, 3.0),
        )
        .expect("valid normal");

        assert_relative_eq!(plane.u.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(plane.v.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(plane.u.dot(&plane.v), 0.0, epsilon = 1e-12);
        assert_relative_eq!(plane.u.dot(&plane.normal), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn project_lift_round_trip_on_plane() {
        let plane = RegionPlane::fit(Vector3::z(), Point3::new(0.0, 0.0, 1.0))
            .expect("valid normal");
        let p = Point3::new(0.5, -0.25, 1.0);
        let lifted = plane.lift(plane.project(p), 0.0);
        assert_relative_eq!((lifted - p).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn lift_raises_along_normal() {
        let plane = RegionPlane::fit(Vector3::z(), Point3::origin()).expect("valid normal");
        let lifted = plane.lift(Point2::new(0.0, 0.0), 2.0);
        assert_relative_eq!(lifted.z, 2.0);
    }

    #[test]
    fn zero_normal_rejected() {
        assert!(RegionPlane::fit(Vector3::zeros(), Point3::origin()).is_none());
    }
}
