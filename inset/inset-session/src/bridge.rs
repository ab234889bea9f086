//! Transfer between a host mesh and the engine's model type.
//!
//! Extraction copies the selected faces into a fresh [`Model`] whose faces
//! are tagged with the host face they came from; the tag survives the
//! offset and tessellation passes, so write-back can copy attributes from
//! the right original. Write-back removes the replaced originals, welds new
//! points onto existing host vertices, and skips faces the mesh already
//! has.

use hashbrown::{HashMap, HashSet};
use tracing::{debug, warn};

use inset_types::{Model, PointRegistry};

use crate::error::{SessionError, SessionResult};
use crate::mesh::{EditableMesh, FaceAttributes};

/// Copy the selected faces of `mesh` into a model.
///
/// Face tags record host face indices. Host faces with degenerate
/// boundaries are skipped with a warning.
///
/// # Errors
///
/// [`SessionError::EmptySelection`] when nothing is selected or every
/// selected face is degenerate.
#[allow(clippy::cast_possible_truncation)]
pub fn extract_selection(mesh: &impl EditableMesh) -> SessionResult<Model> {
    let mut model = Model::new();
    for f in 0..mesh.face_count() as u32 {
        if !mesh.face_selected(f) {
            continue;
        }
        let Some(vertices) = mesh.face_vertices(f) else {
            continue;
        };
        let indices: Vec<u32> = vertices
            .iter()
            .filter_map(|&v| mesh.vertex_position(v).map(|p| model.add_point(p)))
            .collect();
        if let Err(err) = model.add_face(indices, Some(f)) {
            warn!(face = f, %err, "selected face skipped");
        }
    }
    if model.is_empty() {
        return Err(SessionError::EmptySelection);
    }
    Ok(model)
}

/// What a write-back did to the host mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBackReport {
    /// Host indices of the faces added.
    pub added_faces: Vec<u32>,
    /// Host indices of the added faces that cover shrunk interiors; these
    /// end up selected.
    pub inner_faces: Vec<u32>,
    /// Number of faces skipped because the mesh already had them.
    pub skipped_duplicates: usize,
}

/// Replace the selected faces of `mesh` with the faces of `model`.
///
/// `inner` lists the faces of `model` that cover shrunk interiors; they
/// are selected on the host after the write. New points within the model's
/// tolerance of an existing host vertex reuse that vertex. A face the mesh
/// already holds (same vertex cycle in either direction) is skipped with a
/// warning rather than duplicated.
#[allow(clippy::cast_possible_truncation)]
pub fn write_back(
    mesh: &mut impl EditableMesh,
    model: &Model,
    inner: &HashSet<u32>,
) -> WriteBackReport {
    let selected: Vec<u32> = (0..mesh.face_count() as u32)
        .filter(|&f| mesh.face_selected(f))
        .collect();
    let attributes: HashMap<u32, FaceAttributes> = selected
        .iter()
        .filter_map(|&f| mesh.face_attributes(f).map(|a| (f, a)))
        .collect();
    mesh.remove_faces(&selected);

    let mut present: HashSet<Vec<u32>> = (0..mesh.face_count() as u32)
        .filter_map(|f| mesh.face_vertices(f).map(|c| canonical_cycle(&c)))
        .collect();

    // Weld map from model point indices to host vertices, seeded with the
    // existing vertices so coincident points reuse them.
    let mut registry = PointRegistry::with_epsilon(model.points().epsilon());
    let mut host_of: Vec<u32> = Vec::new();
    for v in 0..mesh.vertex_count() as u32 {
        if let Some(p) = mesh.vertex_position(v) {
            let index = registry.add(p);
            if index as usize == host_of.len() {
                host_of.push(v);
            }
        }
    }

    let mut report = WriteBackReport::default();
    for f in 0..model.face_count() as u32 {
        let Some(face) = model.face(f) else { continue };
        let mut cycle = Vec::with_capacity(face.vertex_count());
        for &i in face.indices() {
            let Some(p) = model.point(i) else { continue };
            let index = registry.add(p);
            if index as usize == host_of.len() {
                host_of.push(mesh.add_vertex(p));
            }
            cycle.push(host_of[index as usize]);
        }
        cycle.dedup();
        if cycle.len() > 1 && cycle.first() == cycle.last() {
            cycle.pop();
        }
        if cycle.len() < 3 {
            debug!(face = f, "welded face degenerated, dropped");
            continue;
        }
        let key = canonical_cycle(&cycle);
        if !present.insert(key) {
            warn!(face = f, "duplicate face skipped");
            report.skipped_duplicates += 1;
            continue;
        }
        let attrs = face
            .source()
            .and_then(|s| attributes.get(&s).copied())
            .unwrap_or_default();
        let host_face = mesh.add_face(cycle, attrs);
        if inner.contains(&f) {
            mesh.set_face_selected(host_face, true);
            report.inner_faces.push(host_face);
        }
        report.added_faces.push(host_face);
    }
    report
}

/// Rotation- and direction-independent form of a vertex cycle.
fn canonical_cycle(cycle: &[u32]) -> Vec<u32> {
    let n = cycle.len();
    if n == 0 {
        return Vec::new();
    }
    let mut best: Option<Vec<u32>> = None;
    let mut consider = |candidate: Vec<u32>| {
        if best.as_ref().is_none_or(|b| candidate < *b) {
            best = Some(candidate);
        }
    };
    let reversed: Vec<u32> = cycle.iter().rev().copied().collect();
    for start in 0..n {
        let forward: Vec<u32> = (0..n).map(|k| cycle[(start + k) % n]).collect();
        consider(forward);
        let backward: Vec<u32> = (0..n).map(|k| reversed[(start + k) % n]).collect();
        consider(backward);
    }
    best.unwrap_or_default()
}
