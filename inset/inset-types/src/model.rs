//! Model: a point registry plus a face list.

use hashbrown::HashSet;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Aabb, Face, ModelError, ModelResult, PointRegistry};

/// A polygonal mesh fragment: deduplicated points plus n-gon faces.
///
/// A model is value-like and single-owner: the inset driver creates one per
/// operation from the host selection, transforms it, and discards it after
/// the result is written back. Faces reference points by `u32` index into
/// the owned [`PointRegistry`].
///
/// # Example
///
/// ```
/// use inset_types::{Model, Point3};
///
/// let mut model = Model::new();
/// let a = model.add_point(Point3::new(0.0, 0.0, 0.0));
/// let b = model.add_point(Point3::new(1.0, 0.0, 0.0));
/// let c = model.add_point(Point3::new(1.0, 1.0, 0.0));
/// let d = model.add_point(Point3::new(0.0, 1.0, 0.0));
/// model.add_face(vec![a, b, c, d], Some(0)).unwrap();
///
/// assert_eq!(model.point_count(), 4);
/// assert!(!model.has_orphan_points());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Model {
    points: PointRegistry,
    faces: Vec<Face>,
}

impl Model {
    /// Create an empty model with the default point tolerance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty model with a custom point deduplication tolerance.
    #[must_use]
    pub fn with_epsilon(epsilon: f64) -> Self {
        Self {
            points: PointRegistry::with_epsilon(epsilon),
            faces: Vec::new(),
        }
    }

    /// The point registry.
    #[must_use]
    pub const fn points(&self) -> &PointRegistry {
        &self.points
    }

    /// Number of distinct points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Whether the model holds no faces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Add a point, deduplicating against existing points.
    pub fn add_point(&mut self, coord: Point3<f64>) -> u32 {
        self.points.add(coord)
    }

    /// Coordinate of a point by index.
    #[must_use]
    pub fn point(&self, index: u32) -> Option<Point3<f64>> {
        self.points.get(index)
    }

    /// Add a face from point indices, optionally tagged with the host face
    /// it derives from.
    ///
    /// # Errors
    ///
    /// - [`ModelError::DegenerateFace`] for fewer than 3 indices
    /// - [`ModelError::RepeatedPoint`] when an index repeats in the boundary
    /// - [`ModelError::PointOutOfRange`] when an index has no point
    #[allow(clippy::cast_possible_truncation)]
    // Face counts are bounded by u32 point indices.
    pub fn add_face(&mut self, indices: Vec<u32>, source: Option<u32>) -> ModelResult<u32> {
        if indices.len() < 3 {
            return Err(ModelError::DegenerateFace {
                distinct: indices.len(),
            });
        }
        let mut seen = HashSet::with_capacity(indices.len());
        for &index in &indices {
            if index as usize >= self.points.len() {
                return Err(ModelError::PointOutOfRange {
                    index,
                    count: self.points.len(),
                });
            }
            if !seen.insert(index) {
                return Err(ModelError::RepeatedPoint { index });
            }
        }
        let face_index = self.faces.len() as u32;
        self.faces.push(match source {
            Some(tag) => Face::with_source(indices, tag),
            None => Face::new(indices),
        });
        Ok(face_index)
    }

    /// Get a face by index.
    #[must_use]
    pub fn face(&self, index: u32) -> Option<&Face> {
        self.faces.get(index as usize)
    }

    /// Iterate over all faces in index order.
    pub fn faces(&self) -> impl Iterator<Item = &Face> {
        self.faces.iter()
    }

    /// Boundary coordinates of a face, in order.
    ///
    /// Returns `None` if the face index is out of range.
    #[must_use]
    pub fn face_points(&self, index: u32) -> Option<Vec<Point3<f64>>> {
        let face = self.face(index)?;
        face.indices()
            .iter()
            .map(|&i| self.points.get(i))
            .collect()
    }

    /// Face normal via Newell's method, normalized.
    ///
    /// Robust for non-convex and slightly non-planar boundaries. Returns
    /// `None` for an out-of-range face or a zero-area boundary.
    #[must_use]
    pub fn face_normal(&self, index: u32) -> Option<Vector3<f64>> {
        let points = self.face_points(index)?;
        let normal = newell_normal(&points);
        (normal.norm() > f64::EPSILON).then(|| normal.normalize())
    }

    /// Area centroid approximation: mean of the boundary points.
    #[must_use]
    pub fn face_centroid(&self, index: u32) -> Option<Point3<f64>> {
        let points = self.face_points(index)?;
        let n = points.len() as f64;
        let sum = points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Some(Point3::from(sum / n))
    }

    /// Set of point indices referenced by at least one face.
    #[must_use]
    pub fn referenced_points(&self) -> HashSet<u32> {
        let mut referenced = HashSet::new();
        for face in &self.faces {
            referenced.extend(face.indices().iter().copied());
        }
        referenced
    }

    /// Whether any stored point is referenced by no face.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn has_orphan_points(&self) -> bool {
        let referenced = self.referenced_points();
        (0..self.points.len() as u32).any(|i| !referenced.contains(&i))
    }

    /// Bounding box of all points.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.points.iter())
    }
}

/// Newell's method: area-weighted normal of a polygon boundary (unnormalized).
#[must_use]
pub fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
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

    #[test]
    fn add_face_rejects_too_few_indices() {
        let mut model = Model::new();
        let a = model.add_point(Point3::new(0.0, 0.0, 0.0));
        let b = model.add_point(Point3::new(1.0, 0.0, 0.0));
        let err = model.add_face(vec![a, b], None).unwrap_err();
        assert_eq!(err, ModelError::DegenerateFace { distinct: 2 });
    }

    #[test]
    fn add_face_rejects_repeated_index() {
        let mut model = Model::new();
        let a = model.add_point(Point3::new(0.0, 0.0, 0.0));
        let b = model.add_point(Point3::new(1.0, 0.0, 0.0));
        let c = model.add_point(Point3::new(0.0, 1.0, 0.0));
        let err = model.add_face(vec![a, b, c, a], None).unwrap_err();
        assert_eq!(err, ModelError::RepeatedPoint { index: a });
    }

    #[test]
    fn add_face_rejects_out_of_range_index() {
        let mut model = Model::new();
        let a = model.add_point(Point3::new(0.0, 0.0, 0.0));
        let b = model.add_point(Point3::new(1.0, 0.0, 0.0));
        let err = model.add_face(vec![a, b, 99], None).unwrap_err();
        assert_eq!(err, ModelError::PointOutOfRange { index: 99, count: 2 });
    }

    #[test]
    fn square_normal_points_up() {
        let model = unit_square();
        let normal = model.face_normal(0).expect("normal");
        assert_relative_eq!(normal.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn centroid_of_square() {
        let model = unit_square();
        let c = model.face_centroid(0).expect("centroid");
        assert_relative_eq!(c.x, 0.5);
        assert_relative_eq!(c.y, 0.5);
        assert_relative_eq!(c.z, 0.0);
    }

    #[test]
    fn orphan_detection() {
        let mut model = unit_square();
        assert!(!model.has_orphan_points());
        model.add_point(Point3::new(9.0, 9.0, 9.0));
        assert!(model.has_orphan_points());
    }

    #[test]
    fn shared_points_deduplicate_across_faces() {
        let mut model = unit_square();
        let b = model.add_point(Point3::new(1.0, 0.0, 0.0));
        let c = model.add_point(Point3::new(1.0, 1.0, 0.0));
        assert_eq!(b, 1);
        assert_eq!(c, 2);
        let e = model.add_point(Point3::new(2.0, 0.0, 0.0));
        let f = model.add_point(Point3::new(2.0, 1.0, 0.0));
        model
            .add_face(vec![b, e, f, c], Some(1))
            .expect("valid face");
        assert_eq!(model.point_count(), 6);
        assert_eq!(model.face_count(), 2);
    }

    #[test]
    fn clone_equals_original() {
        let model = unit_square();
        assert_eq!(model.clone(), model);
    }

    #[test]
    fn bounds_cover_all_points() {
        let model = unit_square();
        let bounds = model.bounds();
        assert_relative_eq!(bounds.min.x, 0.0);
        assert_relative_eq!(bounds.max.y, 1.0);
    }
}
