//! Host bridge for interactive insetting.
//!
//! The engine crates are host-free; this crate is the seam where a real
//! mesh editor plugs in. It provides:
//!
//! - [`EditableMesh`]: the trait a host mesh adapter implements, with
//!   [`SessionMesh`] as the in-memory reference implementation.
//! - [`MeshSnapshot`]: an immutable copy of the mesh, captured once per
//!   interaction and restored before every parameter replay.
//! - [`ViewParams`] and [`calc_pixel_size`]: mapping pointer travel in
//!   pixels to model units at the selection.
//! - [`InsetSession`]: the modal state machine fed [`SessionEvent`]s,
//!   driving extract, offset, tessellate, and write-back on each change.
//!
//! # Example
//!
//! ```
//! use inset_session::{
//!     EditableMesh, FaceAttributes, InsetSession, SessionEvent, SessionMesh, SessionStatus,
//!     ViewParams,
//! };
//! use inset_types::Point3;
//!
//! let mut mesh = SessionMesh::new();
//! let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
//! let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
//! let c = mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
//! let d = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
//! let face = mesh.add_face(vec![a, b, c, d], FaceAttributes::default());
//! mesh.set_face_selected(face, true);
//!
//! let view = ViewParams::orthographic(200.0);
//! let mut session = InsetSession::start(&mesh, &view, (0.0, 0.0)).unwrap();
//! session
//!     .handle_event(&mut mesh, SessionEvent::PointerMoved { x: 20.0, y: 0.0 })
//!     .unwrap();
//! let status = session.handle_event(&mut mesh, SessionEvent::Confirm).unwrap();
//!
//! assert_eq!(status, SessionStatus::Finished);
//! assert_eq!(mesh.face_count(), 5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bridge;
mod error;
mod mesh;
mod session;
mod view;

pub use bridge::{WriteBackReport, extract_selection, write_back};
pub use error::{SessionError, SessionResult};
pub use mesh::{EditableMesh, FaceAttributes, MeshSnapshot, SessionMesh, SnapshotFace};
pub use session::{InsetSession, SessionEvent, SessionState, SessionStatus};
pub use view::{ViewParams, calc_pixel_size};
