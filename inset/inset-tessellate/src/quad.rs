//! Quad-dominant tessellation: triangulate, then pair triangles back up.

use hashbrown::HashMap;
use nalgebra::{Point2, Vector2};

use inset_types::Model;

use crate::error::TessellateResult;
use crate::triangulate::{TessellateOutput, clip_ears, rebuild};

const AREA_EPS: f64 = 1e-12;

/// Acceptance thresholds for merging two triangles into a quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadParams {
    /// Largest allowed deviation of any quad corner from a right angle,
    /// in radians.
    pub max_angle_deviation: f64,
    /// Largest allowed ratio of the longest quad side to the shortest.
    pub max_aspect_ratio: f64,
}

impl Default for QuadParams {
    fn default() -> Self {
        Self {
            max_angle_deviation: std::f64::consts::FRAC_PI_3,
            max_aspect_ratio: 8.0,
        }
    }
}

impl QuadParams {
    /// Set the corner-angle threshold.
    #[must_use]
    pub const fn max_angle_deviation(mut self, radians: f64) -> Self {
        self.max_angle_deviation = radians;
        self
    }

    /// Set the side-length ratio threshold.
    #[must_use]
    pub const fn max_aspect_ratio(mut self, ratio: f64) -> Self {
        self.max_aspect_ratio = ratio;
        self
    }
}

/// Quadrangulate the selected n-gon faces of `model`.
///
/// Each selected face with more than four sides is triangulated exactly as
/// [`crate::triangulate_model`] would, then adjacent triangle pairs are
/// greedily merged into quads where the merged corner angles and aspect
/// ratio stay within `params`. The result therefore never has more faces
/// than the triangulated one. Everything else behaves as triangulation:
/// small faces pass through, derived faces inherit tags.
///
/// # Errors
///
/// [`TessellateError::FaceOutOfRange`](crate::TessellateError::FaceOutOfRange)
/// when `faces` names a face the model does not have.
pub fn quadrangulate_model(
    model: &Model,
    faces: &[u32],
    params: &QuadParams,
) -> TessellateResult<TessellateOutput> {
    rebuild(model, faces, |flat| {
        let triangles = clip_ears(flat);
        pair_triangles(&triangles, flat, params)
    })
}

type DirectedEdge = (u32, u32);

/// Greedily merge adjacent triangles into quads.
///
/// Candidate pairs share a directed edge in opposite directions. Pairs are
/// ranked by how close the merged corners come to right angles, and each
/// triangle joins at most one quad.
fn pair_triangles(
    triangles: &[[u32; 3]],
    flat: &[(u32, Point2<f64>)],
    params: &QuadParams,
) -> Vec<Vec<u32>> {
    let positions: HashMap<u32, Point2<f64>> = flat.iter().copied().collect();

    let mut by_edge: HashMap<DirectedEdge, (usize, u32)> = HashMap::new();
    for (t, tri) in triangles.iter().enumerate() {
        for k in 0..3 {
            let a = tri[k];
            let b = tri[(k + 1) % 3];
            let opposite = tri[(k + 2) % 3];
            by_edge.insert((a, b), (t, opposite));
        }
    }

    // (score, t1, t2, quad boundary), best first.
    let mut candidates: Vec<(f64, usize, usize, [u32; 4])> = Vec::new();
    for (&(a, b), &(t1, r1)) in &by_edge {
        if a >= b {
            continue; // Visit each undirected edge once.
        }
        let Some(&(t2, r2)) = by_edge.get(&(b, a)) else {
            continue;
        };
        // t1 holds a -> b, so its third corner comes before a in the cycle.
        let quad = [r1, a, r2, b];
        let Some(score) = score_quad(quad, &positions, params) else {
            continue;
        };
        candidates.push((score, t1, t2, quad));
    }
    candidates.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)));

    let mut used = vec![false; triangles.len()];
    let mut out: Vec<Vec<u32>> = Vec::new();
    for (_, t1, t2, quad) in candidates {
        if used[t1] || used[t2] {
            continue;
        }
        used[t1] = true;
        used[t2] = true;
        out.push(quad.to_vec());
    }
    for (t, tri) in triangles.iter().enumerate() {
        if !used[t] {
            out.push(tri.to_vec());
        }
    }
    out
}

/// Score a candidate quad, lower is better. `None` rejects it.
fn score_quad(
    quad: [u32; 4],
    positions: &HashMap<u32, Point2<f64>>,
    params: &QuadParams,
) -> Option<f64> {
    let mut points = [Point2::origin(); 4];
    for (slot, &index) in points.iter_mut().zip(&quad) {
        *slot = *positions.get(&index)?;
    }

    let mut shortest = f64::INFINITY;
    let mut longest: f64 = 0.0;
    let mut worst_corner: f64 = 0.0;
    for i in 0..4 {
        let prev = points[(i + 3) % 4];
        let cur = points[i];
        let next = points[(i + 1) % 4];
        let into: Vector2<f64> = cur - prev;
        let out: Vector2<f64> = next - cur;
        if into.x * out.y - into.y * out.x <= AREA_EPS {
            return None; // Reflex or collinear corner: not convex.
        }
        let side = out.norm();
        shortest = shortest.min(side);
        longest = longest.max(side);
        let corner = std::f64::consts::PI - into.angle(&out);
        worst_corner = worst_corner.max((corner - std::f64::consts::FRAC_PI_2).abs());
    }

    if worst_corner > params.max_angle_deviation {
        return None;
    }
    if shortest <= AREA_EPS || longest / shortest > params.max_aspect_ratio {
        return None;
    }
    Some(worst_corner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulate_model;
    use nalgebra::Point3;

    fn regular(n: u32) -> Model {
        let mut model = Model::new();
        let indices: Vec<u32> = (0..n)
            .map(|i| {
                let angle = std::f64::consts::TAU * f64::from(i) / f64::from(n);
                model.add_point(Point3::new(angle.cos(), angle.sin(), 0.0))
            })
            .collect();
        model.add_face(indices, Some(0)).expect("valid polygon");
        model
    }

    #[test]
    fn hexagon_pairs_into_two_quads() {
        let model = regular(6);
        let out = quadrangulate_model(&model, &[0], &QuadParams::default()).expect("tessellate");
        assert_eq!(out.model.face_count(), 2);
        for face in out.model.faces() {
            assert_eq!(face.vertex_count(), 4);
            assert_eq!(face.source(), Some(0));
        }
    }

    #[test]
    fn pentagon_leaves_one_triangle() {
        let model = regular(5);
        let out = quadrangulate_model(&model, &[0], &QuadParams::default()).expect("tessellate");
        // Three triangles pair into at most one quad plus one leftover.
        assert_eq!(out.model.face_count(), 2);
        let mut sides: Vec<usize> = out.model.faces().map(|f| f.vertex_count()).collect();
        sides.sort_unstable();
        assert_eq!(sides, vec![3, 4]);
    }

    #[test]
    fn never_more_faces_than_triangulation() {
        for n in 5..12 {
            let model = regular(n);
            let tris = triangulate_model(&model, &[0]).expect("tessellate");
            let quads =
                quadrangulate_model(&model, &[0], &QuadParams::default()).expect("tessellate");
            assert!(
                quads.model.face_count() <= tris.model.face_count(),
                "n = {n}"
            );
        }
    }

    #[test]
    fn strict_params_fall_back_to_triangles() {
        let model = regular(6);
        let params = QuadParams::default().max_angle_deviation(0.01);
        let out = quadrangulate_model(&model, &[0], &params).expect("tessellate");
        assert_eq!(out.model.face_count(), 4);
        for face in out.model.faces() {
            assert_eq!(face.vertex_count(), 3);
        }
    }

    #[test]
    fn quads_and_triangles_pass_through() {
        let mut model = Model::new();
        let a = model.add_point(Point3::new(0.0, 0.0, 0.0));
        let b = model.add_point(Point3::new(1.0, 0.0, 0.0));
        let c = model.add_point(Point3::new(1.0, 1.0, 0.0));
        let d = model.add_point(Point3::new(0.0, 1.0, 0.0));
        model.add_face(vec![a, b, c, d], None).expect("valid face");
        let out = quadrangulate_model(&model, &[0], &QuadParams::default()).expect("tessellate");
        assert_eq!(out.model, model);
        assert_eq!(out.derived_from, vec![0]);
    }

    #[test]
    fn derived_faces_map_to_their_source() {
        let mut model = regular(6);
        let a = model.add_point(Point3::new(5.0, 0.0, 0.0));
        let b = model.add_point(Point3::new(6.0, 0.0, 0.0));
        let c = model.add_point(Point3::new(6.0, 1.0, 0.0));
        model.add_face(vec![a, b, c], Some(9)).expect("valid face");
        let out = quadrangulate_model(&model, &[0, 1], &QuadParams::default()).expect("tessellate");
        assert!(out.derived_from.iter().all(|&f| f == 0 || f == 1));
        assert_eq!(*out.derived_from.last().expect("faces"), 1);
    }
}
