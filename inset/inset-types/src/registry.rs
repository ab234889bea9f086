//! Deduplicated point storage.

use hashbrown::HashMap;
use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default tolerance for point deduplication.
pub(crate) const DEFAULT_EPSILON: f64 = 1e-7;

/// An ordered collection of 3D points, deduplicated on insert.
///
/// Points are referenced by stable `u32` index. Inserting a coordinate that
/// matches an existing point within the registry tolerance returns the
/// existing index instead of appending, so no two distinct indices ever
/// resolve to the same coordinate within tolerance.
///
/// Lookup uses a spatial hash over quantized cells, so insertion stays O(1)
/// regardless of registry size.
///
/// # Example
///
/// ```
/// use inset_types::{Point3, PointRegistry};
///
/// let mut registry = PointRegistry::new();
/// let a = registry.add(Point3::new(0.0, 0.0, 0.0));
/// let b = registry.add(Point3::new(1.0, 0.0, 0.0));
/// // Within tolerance of the first point: same index comes back.
/// let c = registry.add(Point3::new(0.0, 0.0, 1e-9));
///
/// assert_eq!(a, c);
/// assert_ne!(a, b);
/// assert_eq!(registry.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PointRegistry {
    points: Vec<Point3<f64>>,
    cells: HashMap<(i64, i64, i64), Vec<u32>>,
    epsilon: f64,
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct RegistryRepr {
    points: Vec<Point3<f64>>,
    epsilon: f64,
}

#[cfg(feature = "serde")]
impl Serialize for PointRegistry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RegistryRepr {
            points: self.points.clone(),
            epsilon: self.epsilon,
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for PointRegistry {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = RegistryRepr::deserialize(deserializer)?;
        let mut registry = Self::with_epsilon(repr.epsilon);
        for point in repr.points {
            registry.add(point);
        }
        Ok(registry)
    }
}

impl Default for PointRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PointRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points && self.epsilon == other.epsilon
    }
}

impl PointRegistry {
    /// Create an empty registry with the default tolerance.
    #[must_use]
    pub fn new() -> Self {
        Self::with_epsilon(DEFAULT_EPSILON)
    }

    /// Create an empty registry with a custom deduplication tolerance.
    ///
    /// Non-finite or non-positive tolerances fall back to the default.
    #[must_use]
    pub fn with_epsilon(epsilon: f64) -> Self {
        let epsilon = if epsilon.is_finite() && epsilon > 0.0 {
            epsilon
        } else {
            DEFAULT_EPSILON
        };
        Self {
            points: Vec::new(),
            cells: HashMap::new(),
            epsilon,
        }
    }

    /// The deduplication tolerance.
    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Number of distinct points stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the registry holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a point, returning its index.
    ///
    /// If an existing point lies within the tolerance of `coord`, its index
    /// is returned and the registry is unchanged.
    #[allow(clippy::cast_possible_truncation)]
    // Registries are bounded by u32 indices; >4B points exceeds practical limits.
    pub fn add(&mut self, coord: Point3<f64>) -> u32 {
        if let Some(existing) = self.find(coord) {
            return existing;
        }
        let index = self.points.len() as u32;
        let cell = self.cell_of(coord);
        self.points.push(coord);
        self.cells.entry(cell).or_default().push(index);
        index
    }

    /// Find the index of a point matching `coord` within tolerance.
    #[must_use]
    pub fn find(&self, coord: Point3<f64>) -> Option<u32> {
        let eps_sq = self.epsilon * self.epsilon;
        let (cx, cy, cz) = self.cell_of(coord);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &index in bucket {
                        let p = self.points[index as usize];
                        if (p - coord).norm_squared() <= eps_sq {
                            return Some(index);
                        }
                    }
                }
            }
        }
        None
    }

    /// Get a point by index.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<Point3<f64>> {
        self.points.get(index as usize).copied()
    }

    /// Iterate over all points in index order.
    pub fn iter(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.points.iter().copied()
    }

    /// All points as a slice, in index order.
    #[must_use]
    pub fn as_slice(&self) -> &[Point3<f64>] {
        &self.points
    }

    #[allow(clippy::cast_possible_truncation)]
    // Cell coordinates saturate long before i64 overflow for finite inputs.
    fn cell_of(&self, coord: Point3<f64>) -> (i64, i64, i64) {
        let cell = self.epsilon * 2.0;
        (
            (coord.x / cell).floor() as i64,
            (coord.y / cell).floor() as i64,
            (coord.z / cell).floor() as i64,
        )
    }
}
