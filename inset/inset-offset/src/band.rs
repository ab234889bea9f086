//! Face assembly from a finished wavefront.
//!
//! Each contour edge owns one *band face*: the strip that edge swept while
//! offsetting, clipped at the distance limit. Its boundary is stitched from
//! the original edge at the bottom, the arcs of the wavefront vertices that
//! bordered the edge on the sides, and ridge or offset-edge closures at the
//! top. Stitching walks a small directed graph keyed by quantized plane
//! coordinates; a walk that fails to close marks the face degenerate and it
//! is skipped with a debug log rather than reported as an error.
//!
//! Surviving rings become *interior faces* directly.

use hashbrown::HashMap;
use tracing::debug;

use inset_types::Model;
use nalgebra::Point2;

use crate::plane::RegionPlane;
use crate::skeleton::{GEOM_EPS, SkeletonOutput};

/// Quantization grid for stitch keys, one decade above the geometric
/// tolerance so bitwise-equal endpoints always collide.
const KEY_SCALE: f64 = 1.0 / (GEOM_EPS * 10.0);

#[allow(clippy::cast_possible_truncation)]
fn key(p: Point2<f64>) -> (i64, i64) {
    ((p.x * KEY_SCALE).round() as i64, (p.y * KEY_SCALE).round() as i64)
}

/// A directed stitch segment with the wavefront time of its far endpoint.
struct Segment {
    from: Point2<f64>,
    to: Point2<f64>,
    to_time: f64,
}

/// Lift the skeleton output into `model`, recording the indices of the
/// faces added. Points at wavefront time `t` are raised by
/// `height * t / distance` along the region normal.
pub(crate) fn emit_region_faces(
    skeleton: &SkeletonOutput,
    plane: &RegionPlane,
    distance: f64,
    height: f64,
    model: &mut Model,
    inner_faces: &mut Vec<u32>,
    band_faces: &mut Vec<u32>,
) {
    let raise = |t: f64| height * t / distance;

    let region_source = skeleton.edges.first().and_then(|e| e.source);
    for ring in &skeleton.rings {
        let indices: Vec<u32> = ring
            .points
            .iter()
            .map(|&p| model.add_point(plane.lift(p, raise(distance))))
            .collect();
        let source = skeleton.edges[ring.lead_edge].source.or(region_source);
        match model.add_face(indices, source) {
            Ok(face) => inner_faces.push(face),
            Err(err) => debug!(%err, "skipping degenerate interior face"),
        }
    }

    for (e, edge) in skeleton.edges.iter().enumerate() {
        let Some(cycle) = stitch_band_cycle(skeleton, e) else {
            debug!(edge = e, "skipping band face that failed to close");
            continue;
        };
        let indices: Vec<u32> = cycle
            .iter()
            .map(|&(p, t)| model.add_point(plane.lift(p, raise(t))))
            .collect();
        match model.add_face(indices, edge.source) {
            Ok(face) => band_faces.push(face),
            Err(err) => debug!(edge = e, %err, "skipping degenerate band face"),
        }
    }
}

/// Stitch the boundary cycle of contour edge `e`'s band face, bottom edge
/// first. `None` when the segment graph does not close back to the edge
/// start.
fn stitch_band_cycle(
    skeleton: &SkeletonOutput,
    e: usize,
) -> Option<Vec<(Point2<f64>, f64)>> {
    let edge = &skeleton.edges[e];
    let mut segments: Vec<Segment> = Vec::new();
    for arc in &skeleton.arcs {
        if arc.edge_in == e {
            segments.push(Segment {
                from: arc.start,
                to: arc.end,
                to_time: arc.end_time,
            });
        }
        if arc.edge_out == e {
            segments.push(Segment {
                from: arc.end,
                to: arc.start,
                to_time: arc.start_time,
            });
        }
    }
    for closure in &skeleton.closures {
        if closure.edge == e {
            segments.push(Segment {
                from: closure.from,
                to: closure.to,
                to_time: closure.time,
            });
        }
    }
    segments.retain(|s| (s.from - s.to).norm() > GEOM_EPS);

    let mut outgoing: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, seg) in segments.iter().enumerate() {
        outgoing.entry(key(seg.from)).or_default().push(i);
    }

    let target = key(edge.pa);
    let mut cycle = vec![(edge.pa, 0.0), (edge.pb, 0.0)];
    let mut cursor = key(edge.pb);
    for _ in 0..segments.len() {
        let seg = &segments[outgoing.get_mut(&cursor)?.pop()?];
        cursor = key(seg.to);
        if cursor == target {
            return Some(cycle);
        }
        cycle.push((seg.to, seg.to_time));
    }
    None
}
