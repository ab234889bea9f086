//! Triangulation and quadrangulation of n-gon faces.
//!
//! The inset engine produces band faces with arbitrarily many sides when a
//! wavefront collapses in stages. This crate rewrites such n-gons into
//! triangles (ear clipping in the face plane) or, preferably, into quads
//! (triangulation followed by greedy pairing of adjacent triangles).
//! Triangles and quads already present pass through untouched, and every
//! derived face remembers the face it split from.
//!
//! Quadrangulation never produces more faces than triangulation of the same
//! input: pairing only ever merges two triangles into one quad.
//!
//! # Example
//!
//! ```
//! use inset_tessellate::{QuadParams, quadrangulate_model, triangulate_model};
//! use inset_types::{Model, Point3};
//!
//! let mut model = Model::new();
//! let indices: Vec<u32> = (0..6)
//!     .map(|i| {
//!         let angle = std::f64::consts::TAU * f64::from(i) / 6.0;
//!         model.add_point(Point3::new(angle.cos(), angle.sin(), 0.0))
//!     })
//!     .collect();
//! model.add_face(indices, None).unwrap();
//!
//! let tris = triangulate_model(&model, &[0]).unwrap();
//! assert_eq!(tris.model.face_count(), 4);
//!
//! let quads = quadrangulate_model(&model, &[0], &QuadParams::default()).unwrap();
//! assert!(quads.model.face_count() <= tris.model.face_count());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod quad;
mod triangulate;

pub use error::{TessellateError, TessellateResult};
pub use quad::{QuadParams, quadrangulate_model};
pub use triangulate::{TessellateOutput, triangulate_model};
