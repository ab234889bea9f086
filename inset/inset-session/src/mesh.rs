//! The seam to the host application.
//!
//! Everything the session needs from a mesh editor is expressed through
//! [`EditableMesh`], so the driver can be exercised against the in-memory
//! [`SessionMesh`] with no host attached. Hosts adapt their own mesh type
//! by implementing the trait.

use nalgebra::Point3;

use inset_types::Aabb;

/// Per-face attributes the inset copies from original to derived faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaceAttributes {
    /// Material slot index.
    pub material: u32,
    /// Smooth-shading flag.
    pub smooth: bool,
}

impl FaceAttributes {
    /// Attributes with a material slot and flat shading.
    #[must_use]
    pub const fn with_material(material: u32) -> Self {
        Self {
            material,
            smooth: false,
        }
    }

    /// Set the smooth-shading flag.
    #[must_use]
    pub const fn smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }
}

/// Host mesh access the session drives.
///
/// Vertices and faces are addressed by dense `u32` indices. Removing faces
/// renumbers the faces behind them; the session only removes faces before
/// appending replacements, so it never holds stale indices.
pub trait EditableMesh {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;
    /// Position of a vertex, `None` when out of range.
    fn vertex_position(&self, vertex: u32) -> Option<Point3<f64>>;
    /// Selection flag of a vertex.
    fn vertex_selected(&self, vertex: u32) -> bool;
    /// Set the selection flag of a vertex.
    fn set_vertex_selected(&mut self, vertex: u32, selected: bool);

    /// Number of faces.
    fn face_count(&self) -> usize;
    /// Vertex indices of a face boundary, `None` when out of range.
    fn face_vertices(&self, face: u32) -> Option<Vec<u32>>;
    /// Selection flag of a face.
    fn face_selected(&self, face: u32) -> bool;
    /// Set the selection flag of a face.
    fn set_face_selected(&mut self, face: u32, selected: bool);
    /// Attributes of a face, `None` when out of range.
    fn face_attributes(&self, face: u32) -> Option<FaceAttributes>;

    /// Append a vertex, returning its index.
    fn add_vertex(&mut self, position: Point3<f64>) -> u32;
    /// Append a face, returning its index. The face starts deselected.
    fn add_face(&mut self, vertices: Vec<u32>, attributes: FaceAttributes) -> u32;
    /// Remove the listed faces; faces behind them shift down.
    fn remove_faces(&mut self, faces: &[u32]);

    /// Rewrite the whole mesh from a snapshot.
    fn restore(&mut self, snapshot: &MeshSnapshot);
}

/// One face of a [`MeshSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFace {
    /// Boundary vertex indices.
    pub vertices: Vec<u32>,
    /// Face attributes.
    pub attributes: FaceAttributes,
    /// Selection flag.
    pub selected: bool,
}

/// An immutable copy of a mesh, captured once per interaction.
///
/// The session restores the mesh from this value before every replay, so
/// adjusting a parameter mid-drag never compounds on a previous result.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSnapshot {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,
    /// Per-vertex selection flags.
    pub vertex_selected: Vec<bool>,
    /// Faces with attributes and selection.
    pub faces: Vec<SnapshotFace>,
}

impl MeshSnapshot {
    /// Copy the full state of `mesh`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn capture(mesh: &impl EditableMesh) -> Self {
        let vertices = (0..mesh.vertex_count() as u32)
            .filter_map(|v| mesh.vertex_position(v))
            .collect();
        let vertex_selected = (0..mesh.vertex_count() as u32)
            .map(|v| mesh.vertex_selected(v))
            .collect();
        let faces = (0..mesh.face_count() as u32)
            .filter_map(|f| {
                Some(SnapshotFace {
                    vertices: mesh.face_vertices(f)?,
                    attributes: mesh.face_attributes(f)?,
                    selected: mesh.face_selected(f),
                })
            })
            .collect();
        Self {
            vertices,
            vertex_selected,
            faces,
        }
    }

    /// Indices of the selected faces.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn selected_faces(&self) -> Vec<u32> {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, face)| face.selected)
            .map(|(f, _)| f as u32)
            .collect()
    }

    /// Bounding box of the vertices used by selected faces.
    #[must_use]
    pub fn selection_bounds(&self) -> Aabb {
        let points = self
            .faces
            .iter()
            .filter(|face| face.selected)
            .flat_map(|face| face.vertices.iter())
            .filter_map(|&v| self.vertices.get(v as usize).copied());
        Aabb::from_points(points)
    }
}

/// In-memory [`EditableMesh`] used by the test suites and as a reference
/// implementation for host adapters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionMesh {
    vertices: Vec<Point3<f64>>,
    vertex_selected: Vec<bool>,
    faces: Vec<SnapshotFace>,
}

impl SessionMesh {
    /// An empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a face selected. Convenience for test setup.
    pub fn select_face(&mut self, face: u32) {
        self.set_face_selected(face, true);
    }
}

impl EditableMesh for SessionMesh {
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn vertex_position(&self, vertex: u32) -> Option<Point3<f64>> {
        self.vertices.get(vertex as usize).copied()
    }

    fn vertex_selected(&self, vertex: u32) -> bool {
        self.vertex_selected.get(vertex as usize).copied().unwrap_or(false)
    }

    fn set_vertex_selected(&mut self, vertex: u32, selected: bool) {
        if let Some(flag) = self.vertex_selected.get_mut(vertex as usize) {
            *flag = selected;
        }
    }

    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn face_vertices(&self, face: u32) -> Option<Vec<u32>> {
        self.faces.get(face as usize).map(|f| f.vertices.clone())
    }

    fn face_selected(&self, face: u32) -> bool {
        self.faces.get(face as usize).is_some_and(|f| f.selected)
    }

    fn set_face_selected(&mut self, face: u32, selected: bool) {
        if let Some(f) = self.faces.get_mut(face as usize) {
            f.selected = selected;
        }
    }

    fn face_attributes(&self, face: u32) -> Option<FaceAttributes> {
        self.faces.get(face as usize).map(|f| f.attributes)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn add_vertex(&mut self, position: Point3<f64>) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.vertex_selected.push(false);
        index
    }

    #[allow(clippy::cast_possible_truncation)]
    fn add_face(&mut self, vertices: Vec<u32>, attributes: FaceAttributes) -> u32 {
        let index = self.faces.len() as u32;
        self.faces.push(SnapshotFace {
            vertices,
            attributes,
            selected: false,
        });
        index
    }

    #[allow(clippy::cast_possible_truncation)]
    fn remove_faces(&mut self, faces: &[u32]) {
        let doomed: hashbrown::HashSet<u32> = faces.iter().copied().collect();
        let mut index = 0u32;
        self.faces.retain(|_| {
            let keep = !doomed.contains(&index);
            index += 1;
            keep
        });
    }

    fn restore(&mut self, snapshot: &MeshSnapshot) {
        self.vertices.clone_from(&snapshot.vertices);
        self.vertex_selected.clone_from(&snapshot.vertex_selected);
        self.faces.clone_from(&snapshot.faces);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_mesh() -> SessionMesh {
        let mut mesh = SessionMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        let d = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_face(vec![a, b, c, d], FaceAttributes::with_material(2));
        mesh
    }

    #[test]
    fn snapshot_round_trip() {
        let mut mesh = quad_mesh();
        mesh.select_face(0);
        let snapshot = MeshSnapshot::capture(&mesh);

        mesh.add_vertex(Point3::new(5.0, 5.0, 5.0));
        mesh.add_face(vec![0, 1, 4], FaceAttributes::default());
        mesh.set_face_selected(0, false);
        assert_ne!(MeshSnapshot::capture(&mesh), snapshot);

        mesh.restore(&snapshot);
        assert_eq!(MeshSnapshot::capture(&mesh), snapshot);
        assert!(mesh.face_selected(0));
    }

    #[test]
    fn selected_faces_and_bounds() {
        let mut mesh = quad_mesh();
        let snapshot = MeshSnapshot::capture(&mesh);
        assert!(snapshot.selected_faces().is_empty());
        assert!(snapshot.selection_bounds().is_empty());

        mesh.select_face(0);
        let snapshot = MeshSnapshot::capture(&mesh);
        assert_eq!(snapshot.selected_faces(), vec![0]);
        let center = snapshot.selection_bounds().center();
        approx::assert_relative_eq!(center.x, 0.5);
        approx::assert_relative_eq!(center.y, 0.5);
    }

    #[test]
    fn remove_faces_shifts_later_faces_down() {
        let mut mesh = quad_mesh();
        let e = mesh.add_vertex(Point3::new(2.0, 0.0, 0.0));
        mesh.add_face(vec![1, e, 2], FaceAttributes::with_material(7));
        mesh.remove_faces(&[0]);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.face_attributes(0), Some(FaceAttributes::with_material(7)));
    }

    #[test]
    fn attribute_builder() {
        let attrs = FaceAttributes::with_material(3).smooth(true);
        assert_eq!(attrs.material, 3);
        assert!(attrs.smooth);
    }
}
