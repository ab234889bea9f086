//! Region extraction: merging selected faces and tracing boundary loops.
//!
//! In region mode, faces sharing an edge offset as one unit. Interior edges
//! (used by two faces of the same region) vanish; the remaining directed
//! edges are stitched into closed boundary loops. Each boundary edge
//! remembers the face it came from so band faces can inherit its tag.

use hashbrown::{HashMap, HashSet};
use inset_types::Model;
use tracing::debug;

/// A point on a boundary loop. The edge from this point to the next loop
/// point carries `source`, the tag of the face that owned it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LoopPoint {
    pub point: u32,
    pub source: Option<u32>,
}

/// One connected region of the selection, with its boundary loops.
///
/// `loops` is empty when the region boundary could not be traced
/// (non-manifold selection, open chains); the caller passes such regions
/// through unchanged.
#[derive(Debug, Clone)]
pub(crate) struct Region {
    pub faces: Vec<u32>,
    pub loops: Vec<Vec<LoopPoint>>,
}

/// Split the model's faces into regions.
///
/// With `merge` set, faces connected through shared edges form one region
/// each; otherwise every face is its own region bounded by its own boundary.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn build_regions(model: &Model, merge: bool) -> Vec<Region> {
    let face_count = model.face_count() as u32;
    if !merge {
        return (0..face_count)
            .map(|f| Region {
                faces: vec![f],
                loops: vec![face_loop(model, f)],
            })
            .collect();
    }

    let components = connected_components(model);
    components
        .into_iter()
        .map(|faces| {
            let loops = trace_boundary(model, &faces);
            Region { faces, loops }
        })
        .collect()
}

/// The boundary tag for an edge of face `f`: the face's own source if it
/// carries one, else the face's index in the model.
fn edge_source(model: &Model, f: u32) -> Option<u32> {
    model
        .face(f)
        .and_then(inset_types::Face::source)
        .or(Some(f))
}

fn face_loop(model: &Model, f: u32) -> Vec<LoopPoint> {
    let source = edge_source(model, f);
    model
        .face(f)
        .map(|face| {
            face.indices()
                .iter()
                .map(|&point| LoopPoint { point, source })
                .collect()
        })
        .unwrap_or_default()
}

/// Group faces into components connected through shared (undirected) edges.
#[allow(clippy::cast_possible_truncation)]
fn connected_components(model: &Model) -> Vec<Vec<u32>> {
    let mut edge_faces: HashMap<(u32, u32), Vec<u32>> = HashMap::new();
    for (f, face) in model.faces().enumerate() {
        for (a, b) in face.edges() {
            edge_faces
                .entry(normalize_edge(a, b))
                .or_default()
                .push(f as u32);
        }
    }

    let face_count = model.face_count() as u32;
    let mut visited = vec![false; face_count as usize];
    let mut components = Vec::new();
    for start in 0..face_count {
        if visited[start as usize] {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![start];
        visited[start as usize] = true;
        while let Some(f) = stack.pop() {
            component.push(f);
            let Some(face) = model.face(f) else { continue };
            for (a, b) in face.edges() {
                if let Some(neighbors) = edge_faces.get(&normalize_edge(a, b)) {
                    for &n in neighbors {
                        if !visited[n as usize] {
                            visited[n as usize] = true;
                            stack.push(n);
                        }
                    }
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }
    components
}

/// Trace the boundary loops of a face component.
///
/// A directed edge is on the boundary when its undirected counterpart is
/// used by exactly one face of the component. Directed edges keep the face
/// winding, so outer loops come out CCW and hole loops CW.
fn trace_boundary(model: &Model, faces: &[u32]) -> Vec<Vec<LoopPoint>> {
    let mut edge_use: HashMap<(u32, u32), u32> = HashMap::new();
    for &f in faces {
        let Some(face) = model.face(f) else { continue };
        for (a, b) in face.edges() {
            *edge_use.entry(normalize_edge(a, b)).or_insert(0) += 1;
        }
    }

    // Boundary edges in deterministic encounter order, plus a start -> edge map.
    let mut ordered: Vec<(u32, u32, Option<u32>)> = Vec::new();
    let mut from_start: HashMap<u32, (u32, Option<u32>)> = HashMap::new();
    for &f in faces {
        let Some(face) = model.face(f) else { continue };
        let source = edge_source(model, f);
        for (a, b) in face.edges() {
            if edge_use.get(&normalize_edge(a, b)) == Some(&1) {
                if from_start.insert(a, (b, source)).is_some() {
                    // Two boundary edges leave the same point: non-manifold.
                    debug!(point = a, "non-manifold boundary, region skipped");
                    return Vec::new();
                }
                ordered.push((a, b, source));
            }
        }
    }

    let mut used: HashSet<u32> = HashSet::new();
    let mut loops = Vec::new();
    for &(start, _, _) in &ordered {
        if used.contains(&start) {
            continue;
        }
        let mut ring = Vec::new();
        let mut cur = start;
        loop {
            let Some(&(next, source)) = from_start.get(&cur) else {
                debug!(point = cur, "open boundary chain, region skipped");
                return Vec::new();
            };
            if !used.insert(cur) {
                debug!(point = cur, "boundary edge reused, region skipped");
                return Vec::new();
            }
            ring.push(LoopPoint {
                point: cur,
                source,
            });
            cur = next;
            if cur == start {
                break;
            }
        }
        if ring.len() >= 3 {
            loops.push(ring);
        }
    }
    loops
}

const fn normalize_edge(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}
