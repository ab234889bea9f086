//! Polygon face type.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An n-gon boundary: an ordered list of point indices, CCW when viewed from
/// the front side.
///
/// A face optionally carries a `source` tag remembering which host face it
/// was derived from. The inset engine uses this to copy material and shading
/// attributes from the original face onto the geometry that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Face {
    /// Point indices forming the boundary, in CCW order.
    indices: Vec<u32>,
    /// Index of the host face this face derives from, if any.
    source: Option<u32>,
}

impl Face {
    /// Create a face from point indices with no source tag.
    ///
    /// Validity (length, distinctness, range) is checked by
    /// [`Model::add_face`](crate::Model::add_face), not here.
    #[must_use]
    pub const fn new(indices: Vec<u32>) -> Self {
        Self {
            indices,
            source: None,
        }
    }

    /// Create a face carrying a source tag.
    #[must_use]
    pub const fn with_source(indices: Vec<u32>, source: u32) -> Self {
        Self {
            indices,
            source: Some(source),
        }
    }

    /// The point indices in boundary order.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// The source tag, if any.
    #[must_use]
    pub const fn source(&self) -> Option<u32> {
        self.source
    }

    /// Number of boundary vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.indices.len()
    }

    /// Iterate over the boundary edges as `(from, to)` index pairs,
    /// wrapping from the last vertex back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let n = self.indices.len();
        (0..n).map(move |i| (self.indices[i], self.indices[(i + 1) % n]))
    }

    /// Whether the boundary contains the given point index.
    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        self.indices.contains(&index)
    }
}
