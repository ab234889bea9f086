//! Straight-skeleton inset of a model.
//!
//! This is the crate's public operation: take a model of selected faces,
//! shrink each region's boundary inward by a distance, optionally raising
//! the shrunk boundary, and return a fresh model of interior and band faces
//! replacing the originals. Regions the wavefront cannot handle are carried
//! through unchanged rather than failing the whole operation.

use nalgebra::{Point3, Vector2, Vector3};
use tracing::{debug, info};

use inset_types::{Model, newell_normal};

use crate::contour::{LoopPoint, Region, build_regions};
use crate::error::{OffsetError, OffsetResult};
use crate::plane::RegionPlane;
use crate::skeleton::{GEOM_EPS, shrink};
use crate::band::emit_region_faces;

/// Parameters of one inset operation.
///
/// `quadrangulate` is not consumed here; it rides along for drivers that
/// run a tessellation pass over the band faces afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsetParams {
    /// Inward offset distance in model units. Must be finite and
    /// non-negative; zero makes the operation a no-op.
    pub distance: f64,
    /// Raise of the offset boundary along the region normal, reached at
    /// full distance. Must be finite; may be negative.
    pub height: f64,
    /// Merge edge-connected faces into regions and inset each region as
    /// one unit. When `false` every face insets independently.
    pub region: bool,
    /// Ask downstream tessellation to merge band triangles into quads.
    pub quadrangulate: bool,
}

impl Default for InsetParams {
    fn default() -> Self {
        Self {
            distance: 0.0,
            height: 0.0,
            region: true,
            quadrangulate: true,
        }
    }
}

impl InsetParams {
    /// Parameters with a distance and everything else at defaults.
    #[must_use]
    pub fn with_distance(distance: f64) -> Self {
        Self {
            distance,
            ..Self::default()
        }
    }

    /// Set the boundary raise.
    #[must_use]
    pub const fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Set region merging.
    #[must_use]
    pub const fn region(mut self, region: bool) -> Self {
        self.region = region;
        self
    }

    /// Set the quadrangulation request.
    #[must_use]
    pub const fn quadrangulate(mut self, quadrangulate: bool) -> Self {
        self.quadrangulate = quadrangulate;
        self
    }

    fn validate(&self) -> OffsetResult<()> {
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(OffsetError::invalid_distance(format!(
                "distance must be finite and non-negative, got {}",
                self.distance
            )));
        }
        if !self.height.is_finite() {
            return Err(OffsetError::invalid_height(format!(
                "height must be finite, got {}",
                self.height
            )));
        }
        Ok(())
    }
}

/// Result of [`inset_model`]: the replacement model plus the indices of the
/// interior and band faces within it. Faces not listed in either are
/// originals carried through from regions the wavefront skipped.
#[derive(Debug, Clone)]
pub struct InsetOutput {
    /// The replacement model.
    pub model: Model,
    /// Faces covering the shrunk interiors.
    pub inner_faces: Vec<u32>,
    /// Faces bridging original and shrunk boundaries.
    pub band_faces: Vec<u32>,
}

/// Inset every face of `model` by `params.distance`.
///
/// Returns a fresh model in which each region of selected faces is replaced
/// by its interior faces (the boundary shrunk by the distance, raised by
/// the height) and band faces (one per original boundary edge). A region
/// whose wavefront collapses before the distance yields only band faces
/// closing over the ridge. A region the engine cannot process at all keeps
/// its original faces.
///
/// # Errors
///
/// - [`OffsetError::EmptyModel`] when `model` has no faces
/// - [`OffsetError::InvalidDistance`] for negative or non-finite distances
/// - [`OffsetError::InvalidHeight`] for non-finite heights
pub fn inset_model(model: &Model, params: &InsetParams) -> OffsetResult<InsetOutput> {
    params.validate()?;
    if model.is_empty() {
        return Err(OffsetError::EmptyModel);
    }
    if params.distance == 0.0 {
        return Ok(InsetOutput {
            model: model.clone(),
            inner_faces: Vec::new(),
            band_faces: Vec::new(),
        });
    }

    let regions = build_regions(model, params.region);
    info!(
        faces = model.face_count(),
        regions = regions.len(),
        distance = params.distance,
        "inset start"
    );

    let mut out = Model::with_epsilon(model.points().epsilon());
    let mut inner_faces = Vec::new();
    let mut band_faces = Vec::new();
    for region in &regions {
        if !inset_region(model, region, params, &mut out, &mut inner_faces, &mut band_faces) {
            copy_region_faces(model, region, &mut out);
        }
    }

    debug!(
        inner = inner_faces.len(),
        band = band_faces.len(),
        points = out.point_count(),
        "inset done"
    );
    Ok(InsetOutput {
        model: out,
        inner_faces,
        band_faces,
    })
}

/// Offset one region into `out`. `false` means the region was degenerate
/// and produced nothing.
fn inset_region(
    model: &Model,
    region: &Region,
    params: &InsetParams,
    out: &mut Model,
    inner_faces: &mut Vec<u32>,
    band_faces: &mut Vec<u32>,
) -> bool {
    if region.loops.is_empty() {
        return false;
    }
    let Some(plane) = region_plane(model, region) else {
        debug!(faces = region.faces.len(), "region has no usable plane");
        return false;
    };

    let mut projected: Vec<Vec<(LoopPoint, nalgebra::Point2<f64>)>> = Vec::new();
    for ring in &region.loops {
        let mut flat = Vec::with_capacity(ring.len());
        for lp in ring {
            let Some(p3) = model.point(lp.point) else {
                return false;
            };
            flat.push((*lp, plane.project(p3)));
        }
        dedup_ring(&mut flat);
        if flat.len() < 3 {
            debug!("loop collapsed under projection, region skipped");
            return false;
        }
        projected.push(flat);
    }

    let Some(skeleton) = shrink(&projected, params.distance) else {
        debug!(faces = region.faces.len(), "wavefront rejected region");
        return false;
    };
    emit_region_faces(
        &skeleton,
        &plane,
        params.distance,
        params.height,
        out,
        inner_faces,
        band_faces,
    );
    true
}

/// Drop consecutive points that project onto the same position.
fn dedup_ring(ring: &mut Vec<(LoopPoint, nalgebra::Point2<f64>)>) {
    let mut i = 0;
    while ring.len() >= 2 && i < ring.len() {
        let next = (i + 1) % ring.len();
        let gap: Vector2<f64> = ring[next].1 - ring[i].1;
        if gap.norm() <= GEOM_EPS {
            ring.remove(next);
        } else {
            i += 1;
        }
    }
}

/// Plane through the region: area-weighted normal over its faces, centroid
/// of its boundary points.
fn region_plane(model: &Model, region: &Region) -> Option<RegionPlane> {
    let mut normal = Vector3::zeros();
    for &f in &region.faces {
        let points = model.face_points(f)?;
        normal += newell_normal(&points);
    }

    let mut sum = Vector3::zeros();
    let mut count = 0.0;
    for ring in &region.loops {
        for lp in ring {
            sum += model.point(lp.point)?.coords;
            count += 1.0;
        }
    }
    if count == 0.0 {
        return None;
    }
    RegionPlane::fit(normal, Point3::from(sum / count))
}

/// Carry a skipped region's faces into `out` unchanged.
fn copy_region_faces(model: &Model, region: &Region, out: &mut Model) {
    for &f in &region.faces {
        let Some(face) = model.face(f) else { continue };
        let indices: Vec<u32> = face
            .indices()
            .iter()
            .filter_map(|&i| model.point(i).map(|p| out.add_point(p)))
            .collect();
        if let Err(err) = out.add_face(indices, face.source()) {
            debug!(face = f, %err, "carried face dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Model {
        let mut model = Model::new();
        let a = model.add_point(Point3::new(0.0, 0.0, 0.0));
        let b = model.add_point(Point3::new(1.0, 0.0, 0.0));
        let c = model.add_point(Point3::new(1.0, 1.0, 0.0));
        let d = model.add_point(Point3::new(0.0, 1.0, 0.0));
        model
            .add_face(vec![a, b, c, d], Some(0))
            .expect("valid face");
        model
    }

    fn two_squares() -> Model {
        let mut model = unit_square();
        let b = model.add_point(Point3::new(1.0, 0.0, 0.0));
        let c = model.add_point(Point3::new(1.0, 1.0, 0.0));
        let e = model.add_point(Point3::new(2.0, 0.0, 0.0));
        let f = model.add_point(Point3::new(2.0, 1.0, 0.0));
        model
            .add_face(vec![b, e, f, c], Some(1))
            .expect("valid face");
        model
    }

    #[test]
    fn zero_distance_is_identity() {
        let model = unit_square();
        let out = inset_model(&model, &InsetParams::default()).expect("inset");
        assert_eq!(out.model, model);
        assert!(out.inner_faces.is_empty());
        assert!(out.band_faces.is_empty());
    }

    #[test]
    fn empty_model_rejected() {
        let model = Model::new();
        let err = inset_model(&model, &InsetParams::with_distance(0.1)).unwrap_err();
        assert!(matches!(err, OffsetError::EmptyModel));
    }

    #[test]
    fn negative_distance_rejected() {
        let model = unit_square();
        let err = inset_model(&model, &InsetParams::with_distance(-0.1)).unwrap_err();
        assert!(matches!(err, OffsetError::InvalidDistance(_)));
    }

    #[test]
    fn nan_distance_rejected() {
        let model = unit_square();
        let err = inset_model(&model, &InsetParams::with_distance(f64::NAN)).unwrap_err();
        assert!(matches!(err, OffsetError::InvalidDistance(_)));
    }

    #[test]
    fn infinite_height_rejected() {
        let model = unit_square();
        let params = InsetParams::with_distance(0.1).height(f64::INFINITY);
        let err = inset_model(&model, &params).unwrap_err();
        assert!(matches!(err, OffsetError::InvalidHeight(_)));
    }

    #[test]
    fn square_inset_one_inner_four_bands() {
        let model = unit_square();
        let out = inset_model(&model, &InsetParams::with_distance(0.2)).expect("inset");
        assert_eq!(out.inner_faces.len(), 1);
        assert_eq!(out.band_faces.len(), 4);
        assert_eq!(out.model.face_count(), 5);
        assert!(!out.model.has_orphan_points());
        // Flat inset stays in the source plane.
        for p in out.model.points().iter() {
            assert_relative_eq!(p.z, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn square_inset_past_inradius_collapses_gracefully() {
        let model = unit_square();
        let out = inset_model(&model, &InsetParams::with_distance(0.6)).expect("inset");
        assert!(out.inner_faces.is_empty());
        assert_eq!(out.band_faces.len(), 4);
        assert!(!out.model.has_orphan_points());
    }

    #[test]
    fn height_lifts_inner_face() {
        let model = unit_square();
        let params = InsetParams::with_distance(0.2).height(0.3);
        let out = inset_model(&model, &params).expect("inset");
        let inner = out.model.face(out.inner_faces[0]).expect("face");
        for &i in inner.indices() {
            let p = out.model.point(i).expect("point");
            assert_relative_eq!(p.z, 0.3, epsilon = 1e-9);
        }
    }

    #[test]
    fn region_merge_erases_interior_edge() {
        let model = two_squares();
        let out = inset_model(&model, &InsetParams::with_distance(0.2)).expect("inset");
        // One merged 2x1 region: one inner face, six boundary edges.
        assert_eq!(out.inner_faces.len(), 1);
        assert_eq!(out.band_faces.len(), 6);
    }

    #[test]
    fn independent_faces_inset_separately() {
        let model = two_squares();
        let params = InsetParams::with_distance(0.2).region(false);
        let out = inset_model(&model, &params).expect("inset");
        assert_eq!(out.inner_faces.len(), 2);
        assert_eq!(out.band_faces.len(), 8);
    }

    #[test]
    fn band_faces_keep_source_tags() {
        let model = two_squares();
        let params = InsetParams::with_distance(0.2).region(false);
        let out = inset_model(&model, &params).expect("inset");
        let mut tags: Vec<Option<u32>> = out
            .band_faces
            .iter()
            .map(|&f| out.model.face(f).expect("face").source())
            .collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags, vec![Some(0), Some(1)]);
    }

    #[test]
    fn reapplication_is_not_idempotent() {
        let model = unit_square();
        let once = inset_model(&model, &InsetParams::with_distance(0.2)).expect("inset");
        let twice = inset_model(&once.model, &InsetParams::with_distance(0.2)).expect("inset");
        let direct = inset_model(&model, &InsetParams::with_distance(0.4)).expect("inset");
        assert_ne!(twice.model, direct.model);
    }

    fn notch() -> Model {
        // Concave heptagon whose spike at (3, 1) splits the front at
        // t ~= 0.24, well before the flanks collapse.
        let mut model = Model::new();
        let indices: Vec<u32> = [
            (0.0, 0.0),
            (6.0, 0.0),
            (6.0, 4.0),
            (4.0, 4.0),
            (3.0, 1.0),
            (2.0, 4.0),
            (0.0, 4.0),
        ]
        .iter()
        .map(|&(x, y)| model.add_point(Point3::new(x, y, 0.0)))
        .collect();
        model.add_face(indices, Some(0)).expect("valid face");
        model
    }

    fn annulus() -> Model {
        // Four quads around a hole near the left wall. The hole's left
        // side is slanted so its two reflex corners reach the outer wall
        // at different times: t ~= 0.44 and t ~= 0.84.
        let mut model = Model::new();
        let o: Vec<u32> = [(0.0, 0.0), (8.0, 0.0), (8.0, 8.0), (0.0, 8.0)]
            .iter()
            .map(|&(x, y)| model.add_point(Point3::new(x, y, 0.0)))
            .collect();
        let h: Vec<u32> = [(1.0, 3.0), (3.0, 3.0), (3.0, 5.0), (1.5, 5.0)]
            .iter()
            .map(|&(x, y)| model.add_point(Point3::new(x, y, 0.0)))
            .collect();
        model
            .add_face(vec![o[0], o[1], h[1], h[0]], Some(0))
            .expect("valid face");
        model
            .add_face(vec![o[1], o[2], h[2], h[1]], Some(0))
            .expect("valid face");
        model
            .add_face(vec![o[2], o[3], h[3], h[2]], Some(0))
            .expect("valid face");
        model
            .add_face(vec![o[3], o[0], h[0], h[3]], Some(0))
            .expect("valid face");
        model
    }

    #[test]
    fn split_yields_two_interiors_with_closed_bands() {
        let model = notch();
        let out = inset_model(&model, &InsetParams::with_distance(0.3)).expect("inset");
        // The split leaves one interior per surviving front and still one
        // band per boundary edge, stitched through the split point.
        assert_eq!(out.inner_faces.len(), 2);
        assert_eq!(out.band_faces.len(), 7);
        assert_eq!(out.model.face_count(), 9);
        assert!(!out.model.has_orphan_points());
        for p in out.model.points().iter() {
            assert_relative_eq!(p.z, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn hole_merging_with_outer_wall_leaves_one_interior() {
        let model = annulus();

        // Before the fronts meet the annulus keeps two interiors.
        let shallow = inset_model(&model, &InsetParams::with_distance(0.3)).expect("inset");
        assert_eq!(shallow.inner_faces.len(), 2);
        assert_eq!(shallow.band_faces.len(), 8);

        // Past the first reflex corner the hole front fuses with the
        // outer front into a single interior.
        let deep = inset_model(&model, &InsetParams::with_distance(0.6)).expect("inset");
        assert_eq!(deep.inner_faces.len(), 1);
        assert_eq!(deep.band_faces.len(), 8);
        assert_eq!(deep.model.face_count(), 9);
        assert!(!deep.model.has_orphan_points());
    }

    #[test]
    fn tilted_region_insets_in_its_own_plane() {
        // Unit square rotated onto the XZ plane.
        let mut model = Model::new();
        let a = model.add_point(Point3::new(0.0, 0.0, 0.0));
        let b = model.add_point(Point3::new(1.0, 0.0, 0.0));
        let c = model.add_point(Point3::new(1.0, 0.0, 1.0));
        let d = model.add_point(Point3::new(0.0, 0.0, 1.0));
        model.add_face(vec![a, b, c, d], None).expect("valid face");
        let out = inset_model(&model, &InsetParams::with_distance(0.2)).expect("inset");
        assert_eq!(out.inner_faces.len(), 1);
        for p in out.model.points().iter() {
            assert_relative_eq!(p.y, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn degenerate_sliver_is_carried_through() {
        // Collinear boundary collapses under projection; the face survives
        // untouched instead of erroring.
        let mut model = Model::new();
        let a = model.add_point(Point3::new(0.0, 0.0, 0.0));
        let b = model.add_point(Point3::new(1.0, 0.0, 0.0));
        let c = model.add_point(Point3::new(2.0, 0.0, 0.0));
        model.add_face(vec![a, b, c], None).expect("valid face");
        let out = inset_model(&model, &InsetParams::with_distance(0.2)).expect("inset");
        assert!(out.inner_faces.is_empty());
        assert!(out.band_faces.is_empty());
        assert_eq!(out.model.face_count(), 1);
    }
}
