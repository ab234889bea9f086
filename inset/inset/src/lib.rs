//! Straight-skeleton mesh insetting toolkit.
//!
//! This umbrella crate re-exports the inset-* crates, providing a unified
//! API for inward polygon offsetting with sloped bands. All crates are
//! host-free: the only connection to a mesh editor is the
//! [`session::EditableMesh`] trait.
//!
//! # Quick Start
//!
//! ```
//! use inset::prelude::*;
//!
//! // Build a selection as a model.
//! let mut model = Model::new();
//! let a = model.add_point(Point3::new(0.0, 0.0, 0.0));
//! let b = model.add_point(Point3::new(1.0, 0.0, 0.0));
//! let c = model.add_point(Point3::new(1.0, 1.0, 0.0));
//! let d = model.add_point(Point3::new(0.0, 1.0, 0.0));
//! model.add_face(vec![a, b, c, d], None).unwrap();
//!
//! // Shrink the boundary inward by 0.2, raising it by 0.1.
//! let params = InsetParams::with_distance(0.2).height(0.1);
//! let output = inset_model(&model, &params).unwrap();
//!
//! assert_eq!(output.inner_faces.len(), 1);
//! assert_eq!(output.band_faces.len(), 4);
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Core data structures: `Model`, `Face`, `PointRegistry`, `Aabb`
//! - [`offset`] - The straight-skeleton offset engine
//! - [`tessellate`] - Triangulation and quadrangulation of band faces
//! - [`session`] - Host bridge: editable-mesh trait and modal driver
//!
//! # Feature Flags
//!
//! - `serde` - Serialization for the core model types

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Core data structures: `Model`, `Face`, `PointRegistry`, `Aabb`.
pub use inset_types as types;

/// The straight-skeleton offset engine.
pub use inset_offset as offset;

/// Triangulation and quadrangulation of band faces.
pub use inset_tessellate as tessellate;

/// Host bridge: editable-mesh trait and modal session driver.
pub use inset_session as session;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for insetting.
///
/// # Usage
///
/// ```
/// use inset::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use inset_types::{Aabb, Face, Model, Point3, PointRegistry};

    // Offset engine
    pub use inset_offset::{InsetOutput, InsetParams, inset_model};

    // Tessellation
    pub use inset_tessellate::{QuadParams, quadrangulate_model, triangulate_model};

    // Session (main interactive use case)
    pub use inset_session::{
        EditableMesh, InsetSession, SessionEvent, SessionMesh, SessionStatus, ViewParams,
    };
}

// =============================================================================
// Tests
// =============================================================================
