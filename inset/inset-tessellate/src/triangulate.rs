//! Ear-clipping triangulation of n-gon faces.

use hashbrown::HashSet;
use nalgebra::{Point2, Point3, Vector2, Vector3};
use tracing::debug;

use inset_types::{Model, newell_normal};

use crate::error::{TessellateError, TessellateResult};

const AREA_EPS: f64 = 1e-12;

/// Result of a tessellation pass: the rewritten model plus, for every face
/// of it, the index of the input face it derives from.
#[derive(Debug, Clone)]
pub struct TessellateOutput {
    /// The rewritten model. Points are deduplicated afresh, so indices do
    /// not correspond to the input model's.
    pub model: Model,
    /// `derived_from[f]` is the input face that face `f` came from.
    /// Untouched faces map to themselves.
    pub derived_from: Vec<u32>,
}

/// Triangulate the selected n-gon faces of `model`.
///
/// Faces listed in `faces` with more than four sides are ear-clipped into
/// triangles in their own best-fit plane; triangles, quads, and unselected
/// faces are copied through unchanged. Derived faces inherit the source tag
/// of the face they split from. A face whose boundary cannot be projected
/// (zero-area or wildly non-planar) is copied through with a debug log.
///
/// # Errors
///
/// [`TessellateError::FaceOutOfRange`] when `faces` names a face the model
/// does not have.
pub fn triangulate_model(model: &Model, faces: &[u32]) -> TessellateResult<TessellateOutput> {
    rebuild(model, faces, |flat| {
        clip_ears(flat).into_iter().map(|t| t.to_vec()).collect()
    })
}

/// Rewrite `model`, replacing each selected >4-gon with `split`'s output.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn rebuild(
    model: &Model,
    faces: &[u32],
    split: impl Fn(&[(u32, Point2<f64>)]) -> Vec<Vec<u32>>,
) -> TessellateResult<TessellateOutput> {
    let mut selected = HashSet::new();
    for &f in faces {
        if model.face(f).is_none() {
            return Err(TessellateError::face_out_of_range(f, model.face_count()));
        }
        selected.insert(f);
    }

    let mut out = Model::with_epsilon(model.points().epsilon());
    let mut derived_from = Vec::new();
    for f in 0..model.face_count() as u32 {
        let Some(face) = model.face(f) else { continue };
        let boundaries: Vec<Vec<u32>> =
            if selected.contains(&f) && face.vertex_count() > 4 {
                match project_face(model, f) {
                    Some(flat) => split(&flat),
                    None => {
                        debug!(face = f, "unprojectable face copied through");
                        vec![face.indices().to_vec()]
                    }
                }
            } else {
                vec![face.indices().to_vec()]
            };
        for boundary in boundaries {
            let indices: Vec<u32> = boundary
                .iter()
                .filter_map(|&i| model.point(i).map(|p| out.add_point(p)))
                .collect();
            match out.add_face(indices, face.source()) {
                Ok(_) => derived_from.push(f),
                Err(err) => debug!(face = f, %err, "degenerate piece dropped"),
            }
        }
    }
    Ok(TessellateOutput {
        model: out,
        derived_from,
    })
}

/// Project a face's boundary into its best-fit plane, CCW.
///
/// Pairs each original point index with its plane coordinates. `None` when
/// the boundary has no usable normal.
pub(crate) fn project_face(model: &Model, f: u32) -> Option<Vec<(u32, Point2<f64>)>> {
    let face = model.face(f)?;
    let points = model.face_points(f)?;
    let normal = newell_normal(&points);
    if normal.norm() <= AREA_EPS {
        return None;
    }
    let normal = normal.normalize();
    let seed = if normal.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let u = normal.cross(&seed).normalize();
    let v = normal.cross(&u);
    let origin: Point3<f64> = points[0];
    Some(
        face.indices()
            .iter()
            .zip(&points)
            .map(|(&i, p)| {
                let d = p - origin;
                (i, Point2::new(d.dot(&u), d.dot(&v)))
            })
            .collect(),
    )
}

fn cross2(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

fn point_in_triangle(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> bool {
    let d1 = cross2(b - a, p - a);
    let d2 = cross2(c - b, p - b);
    let d3 = cross2(a - c, p - c);
    d1 > AREA_EPS && d2 > AREA_EPS && d3 > AREA_EPS
}

/// Ear-clip a simple polygon into triangles of original point indices.
///
/// Winding must be CCW, as `project_face` produces. Falls back to fanning
/// the remainder when no ear can be found, which only happens for
/// self-intersecting input.
pub(crate) fn clip_ears(flat: &[(u32, Point2<f64>)]) -> Vec<[u32; 3]> {
    let mut poly: Vec<(u32, Point2<f64>)> = flat.to_vec();
    let mut triangles = Vec::with_capacity(poly.len().saturating_sub(2));

    while poly.len() > 3 {
        let n = poly.len();
        let mut clipped = false;
        for i in 0..n {
            let prev = poly[(i + n - 1) % n];
            let cur = poly[i];
            let next = poly[(i + 1) % n];
            if cross2(cur.1 - prev.1, next.1 - cur.1) <= AREA_EPS {
                continue; // Reflex or collinear corner.
            }
            let blocked = poly
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != (i + n - 1) % n && j != i && j != (i + 1) % n)
                .any(|(_, &(_, p))| point_in_triangle(p, prev.1, cur.1, next.1));
            if blocked {
                continue;
            }
            triangles.push([prev.0, cur.0, next.0]);
            poly.remove(i);
            clipped = true;
            break;
        }
        if !clipped {
            debug!(remaining = poly.len(), "no ear found, fanning remainder");
            for i in 1..poly.len() - 1 {
                triangles.push([poly[0].0, poly[i].0, poly[i + 1].0]);
            }
            return triangles;
        }
    }
    if poly.len() == 3 {
        triangles.push([poly[0].0, poly[1].0, poly[2].0]);
    }
    triangles
}
