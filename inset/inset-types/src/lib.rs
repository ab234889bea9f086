//! Core model types for straight-skeleton insetting.
//!
//! This crate provides the foundational types shared by the inset pipeline:
//!
//! - [`PointRegistry`] - Deduplicated 3D point storage with stable indices
//! - [`Face`] - An n-gon boundary as an ordered list of point indices
//! - [`Model`] - A point registry plus a face list
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero host dependencies**. It knows nothing
//! about any 3D application's live mesh structures; the host bridge crate
//! translates in and out of these value types.
//!
//! # Conventions
//!
//! All coordinates are `f64`. Face boundaries are **counter-clockwise (CCW)
//! when viewed from the front side**; normals follow the right-hand rule.
//! Points are referenced everywhere by `u32` index into the registry, and the
//! registry guarantees that no two distinct indices resolve to the same
//! coordinate within its tolerance.
//!
//! # Example
//!
//! ```
//! use inset_types::{Model, Point3};
//!
//! let mut model = Model::new();
//! let a = model.add_point(Point3::new(0.0, 0.0, 0.0));
//! let b = model.add_point(Point3::new(1.0, 0.0, 0.0));
//! let c = model.add_point(Point3::new(0.5, 1.0, 0.0));
//! let face = model.add_face(vec![a, b, c], None).unwrap();
//!
//! assert_eq!(model.face_count(), 1);
//! assert_eq!(model.face(face).unwrap().vertex_count(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bounds;
mod error;
mod face;
mod model;
mod registry;

pub use bounds::Aabb;
pub use error::{ModelError, ModelResult};
pub use face::Face;
pub use model::{Model, newell_normal};
pub use registry::PointRegistry;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};
