//! Straight-skeleton inset engine.
//!
//! This crate computes an inward offset of a polygonal selection: the
//! boundary moves inward by a given distance, optionally rising by a given
//! height, and the gap between the original boundary and the offset boundary
//! is filled with a ruled band of new faces.
//!
//! # Overview
//!
//! The offset is driven by a straight-skeleton construction: every boundary
//! edge sweeps inward at unit speed, and boundary vertices ride the angle
//! bisectors of their adjacent edges. Wavefront events (an edge collapsing to
//! a point, or a reflex vertex splitting the front) are processed from a
//! priority queue until the requested inset distance is reached.
//!
//! - `distance == 0` is a no-op: the input model comes back unchanged.
//! - Selections offset either as merged regions (faces joined across shared
//!   edges, holes supported) or per face, controlled by
//!   [`InsetParams::region`].
//! - Degenerate regions (self-intersecting boundaries, non-manifold edges,
//!   zero-area loops) contribute their original faces unchanged rather than
//!   failing the whole operation.
//! - Offsetting past the region's inradius collapses the wavefront onto its
//!   skeleton ridge: band faces close over the ridge and no interior face is
//!   produced.
//!
//! # Example
//!
//! ```
//! use inset_offset::{InsetParams, inset_model};
//! use inset_types::{Model, Point3};
//!
//! let mut model = Model::new();
//! let a = model.add_point(Point3::new(0.0, 0.0, 0.0));
//! let b = model.add_point(Point3::new(1.0, 0.0, 0.0));
//! let c = model.add_point(Point3::new(1.0, 1.0, 0.0));
//! let d = model.add_point(Point3::new(0.0, 1.0, 0.0));
//! model.add_face(vec![a, b, c, d], None).unwrap();
//!
//! let params = InsetParams::with_distance(0.2);
//! let output = inset_model(&model, &params).unwrap();
//!
//! // One interior square plus one band face per original edge.
//! assert_eq!(output.inner_faces.len(), 1);
//! assert_eq!(output.band_faces.len(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod band;
mod contour;
mod error;
mod offset;
mod plane;
mod skeleton;

pub use error::{OffsetError, OffsetResult};
pub use offset::{InsetOutput, InsetParams, inset_model};
