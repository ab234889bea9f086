//! Viewport math for mapping pointer travel to model units.

use nalgebra::{Matrix4, Point3};

/// The viewport state a session needs: the combined projection matrix and
/// the viewport width in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParams {
    /// World-to-clip projection matrix (perspective or orthographic).
    pub projection: Matrix4<f64>,
    /// Viewport width in pixels.
    pub width: f64,
}

impl ViewParams {
    /// An orthographic identity view of the given pixel width, mapping the
    /// world range [-1, 1] across it. Useful for tests and headless runs.
    #[must_use]
    pub fn orthographic(width: f64) -> Self {
        Self {
            projection: Matrix4::identity(),
            width,
        }
    }
}

/// World-size of one pixel at a point.
///
/// Projects a homogeneous unit through the view: the perspective divide
/// factor at `at` scaled by the clip-to-pixel ratio. Under an orthographic
/// projection the result is constant; under perspective it grows with
/// distance from the camera.
#[must_use]
pub fn calc_pixel_size(view: &ViewParams, at: Point3<f64>) -> f64 {
    let m = &view.projection;
    let zfac = (m[(3, 0)] * at.x + m[(3, 1)] * at.y + m[(3, 2)] * at.z + m[(3, 3)]).abs();
    // Flipped or degenerate views get a sane fallback of 1 world unit for
    // the whole viewport.
    let zfac = if zfac < f64::EPSILON { 1.0 } else { zfac };
    let scale = m[(0, 0)].abs();
    if view.width < 1.0 || scale < f64::EPSILON {
        return 1.0;
    }
    zfac * 2.0 / (view.width * scale)
}
