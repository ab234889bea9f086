//! The modal inset driver.
//!
//! A session is an explicit state machine fed host input events. It
//! captures a [`MeshSnapshot`] once at start and, for every adjusting
//! event, restores the mesh from the snapshot and replays the whole
//! pipeline (extract, offset, tessellate, write back) with the current
//! parameters. Parameters therefore never compound: what is on the mesh
//! always reflects exactly the current drag state.

use hashbrown::HashSet;
use tracing::{debug, info};

use inset_offset::{InsetParams, inset_model};
use inset_tessellate::{QuadParams, quadrangulate_model, triangulate_model};

use crate::bridge::{extract_selection, write_back};
use crate::error::{SessionError, SessionResult};
use crate::mesh::{EditableMesh, MeshSnapshot};
use crate::view::{ViewParams, calc_pixel_size};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting input events.
    Adjusting,
    /// Confirmed; the last replay stays on the mesh.
    Finished,
    /// Cancelled; the snapshot was restored.
    Cancelled,
}

/// Host input driving the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// The pointer moved to a new viewport position, in pixels.
    PointerMoved {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// Enter or leave height mode: pointer travel adjusts the boundary
    /// raise instead of the distance, freezing the other value.
    HeightMode(bool),
    /// Flip region merging and replay.
    ToggleRegion,
    /// Flip quadrangulation and replay.
    ToggleQuadrangulate,
    /// Keep the current result and finish.
    Confirm,
    /// Discard everything and restore the mesh.
    Cancel,
}

/// What [`InsetSession::handle_event`] tells the host to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Keep feeding events.
    Running,
    /// Done; the result is on the mesh.
    Finished,
    /// Done; the mesh is back to its original state.
    Cancelled,
}

/// An interactive inset over one mesh selection.
#[derive(Debug, Clone)]
pub struct InsetSession {
    snapshot: MeshSnapshot,
    params: InsetParams,
    quad_params: QuadParams,
    pixel_size: f64,
    anchor: (f64, f64),
    pointer: (f64, f64),
    height_mode: bool,
    base_distance: f64,
    base_height: f64,
    state: SessionState,
}

impl InsetSession {
    /// Begin a session over the current selection of `mesh`.
    ///
    /// Captures the snapshot, fixes the world-per-pixel factor at the
    /// selection's center, and anchors pointer travel at `pointer`.
    ///
    /// # Errors
    ///
    /// [`SessionError::EmptySelection`] when no face is selected.
    pub fn start(
        mesh: &impl EditableMesh,
        view: &ViewParams,
        pointer: (f64, f64),
    ) -> SessionResult<Self> {
        let snapshot = MeshSnapshot::capture(mesh);
        let selected = snapshot.selected_faces();
        if selected.is_empty() {
            return Err(SessionError::EmptySelection);
        }
        let center = snapshot.selection_bounds().center();
        let pixel_size = calc_pixel_size(view, center);
        info!(
            faces = selected.len(),
            pixel_size, "inset session started"
        );
        Ok(Self {
            snapshot,
            params: InsetParams::default(),
            quad_params: QuadParams::default(),
            pixel_size,
            anchor: pointer,
            pointer,
            height_mode: false,
            base_distance: 0.0,
            base_height: 0.0,
            state: SessionState::Adjusting,
        })
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Parameters the last replay used.
    #[must_use]
    pub const fn params(&self) -> &InsetParams {
        &self.params
    }

    /// World units one pixel of pointer travel is worth.
    #[must_use]
    pub const fn pixel_size(&self) -> f64 {
        self.pixel_size
    }

    /// Feed one event, mutating `mesh` as needed.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Terminated`] after Confirm or Cancel
    /// - errors of the replay pipeline, which leave the mesh restored to
    ///   the snapshot
    pub fn handle_event(
        &mut self,
        mesh: &mut impl EditableMesh,
        event: SessionEvent,
    ) -> SessionResult<SessionStatus> {
        if self.state != SessionState::Adjusting {
            return Err(SessionError::Terminated);
        }
        match event {
            SessionEvent::PointerMoved { x, y } => {
                self.pointer = (x, y);
                let dx = x - self.anchor.0;
                let dy = y - self.anchor.1;
                if self.height_mode {
                    self.params.height = self.base_height + dy * self.pixel_size;
                } else {
                    self.params.distance = self.base_distance + dx.hypot(dy) * self.pixel_size;
                }
                self.replay(mesh)?;
            }
            SessionEvent::HeightMode(active) => {
                if active != self.height_mode {
                    // Re-anchor so the value not being dragged freezes.
                    self.height_mode = active;
                    self.anchor = self.pointer;
                    self.base_distance = self.params.distance;
                    self.base_height = self.params.height;
                }
            }
            SessionEvent::ToggleRegion => {
                self.params.region = !self.params.region;
                self.replay(mesh)?;
            }
            SessionEvent::ToggleQuadrangulate => {
                self.params.quadrangulate = !self.params.quadrangulate;
                self.replay(mesh)?;
            }
            SessionEvent::Confirm => {
                self.state = SessionState::Finished;
                info!(
                    distance = self.params.distance,
                    height = self.params.height,
                    "inset session confirmed"
                );
                return Ok(SessionStatus::Finished);
            }
            SessionEvent::Cancel => {
                mesh.restore(&self.snapshot);
                self.state = SessionState::Cancelled;
                info!("inset session cancelled");
                return Ok(SessionStatus::Cancelled);
            }
        }
        Ok(SessionStatus::Running)
    }

    /// Restore the snapshot and run the pipeline with current parameters.
    fn replay(&self, mesh: &mut impl EditableMesh) -> SessionResult<()> {
        mesh.restore(&self.snapshot);
        if self.params.distance == 0.0 {
            // Nothing to build; the restored originals are the result.
            return Ok(());
        }
        let model = extract_selection(mesh)?;
        let output = inset_model(&model, &self.params)?;
        let tessellated = if self.params.quadrangulate {
            quadrangulate_model(&output.model, &output.band_faces, &self.quad_params)?
        } else {
            triangulate_model(&output.model, &output.band_faces)?
        };
        let inner_inputs: HashSet<u32> = output.inner_faces.iter().copied().collect();
        let inner: HashSet<u32> = tessellated
            .derived_from
            .iter()
            .enumerate()
            .filter(|(_, from)| inner_inputs.contains(*from))
            .map(|(f, _)| u32::try_from(f).unwrap_or(u32::MAX))
            .collect();
        let report = write_back(mesh, &tessellated.model, &inner);
        debug!(
            added = report.added_faces.len(),
            inner = report.inner_faces.len(),
            skipped = report.skipped_duplicates,
            "replay written back"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{FaceAttributes, SessionMesh};
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn selected_quad() -> SessionMesh {
        let mut mesh = SessionMesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        let d = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        let f = mesh.add_face(
            vec![a, b, c, d],
            FaceAttributes::with_material(2).smooth(true),
        );
        mesh.select_face(f);
        mesh
    }

    /// 200-pixel orthographic viewport: one pixel is 0.01 world units.
    fn view() -> ViewParams {
        ViewParams::orthographic(200.0)
    }

    fn start(mesh: &SessionMesh) -> InsetSession {
        InsetSession::start(mesh, &view(), (0.0, 0.0)).expect("session starts")
    }

    #[test]
    fn start_requires_selection() {
        let mut mesh = selected_quad();
        mesh.set_face_selected(0, false);
        assert!(matches!(
            InsetSession::start(&mesh, &view(), (0.0, 0.0)),
            Err(SessionError::EmptySelection)
        ));
    }

    #[test]
    fn drag_insets_and_confirm_keeps_result() {
        let mut mesh = selected_quad();
        let mut session = start(&mesh);

        let status = session
            .handle_event(&mut mesh, SessionEvent::PointerMoved { x: 20.0, y: 0.0 })
            .expect("move");
        assert_eq!(status, SessionStatus::Running);
        assert_relative_eq!(session.params().distance, 0.2);
        // One interior face plus four band quads replace the original.
        assert_eq!(mesh.face_count(), 5);

        let status = session
            .handle_event(&mut mesh, SessionEvent::Confirm)
            .expect("confirm");
        assert_eq!(status, SessionStatus::Finished);
        assert_eq!(mesh.face_count(), 5);
    }

    #[test]
    fn replays_replace_rather_than_compound() {
        let mut mesh = selected_quad();
        let mut session = start(&mesh);
        session
            .handle_event(&mut mesh, SessionEvent::PointerMoved { x: 20.0, y: 0.0 })
            .expect("move");
        session
            .handle_event(&mut mesh, SessionEvent::PointerMoved { x: 0.0, y: 30.0 })
            .expect("move");
        // Distance comes from total travel from the anchor, not the sum of
        // the two replays.
        assert_relative_eq!(session.params().distance, 0.3);
        assert_eq!(mesh.face_count(), 5);
    }

    #[test]
    fn cancel_restores_original_mesh() {
        let mut mesh = selected_quad();
        let before = MeshSnapshot::capture(&mesh);
        let mut session = start(&mesh);
        session
            .handle_event(&mut mesh, SessionEvent::PointerMoved { x: 20.0, y: 0.0 })
            .expect("move");
        assert_ne!(MeshSnapshot::capture(&mesh), before);

        let status = session
            .handle_event(&mut mesh, SessionEvent::Cancel)
            .expect("cancel");
        assert_eq!(status, SessionStatus::Cancelled);
        assert_eq!(MeshSnapshot::capture(&mesh), before);
    }

    #[test]
    fn events_after_terminal_state_are_rejected() {
        let mut mesh = selected_quad();
        let mut session = start(&mesh);
        session
            .handle_event(&mut mesh, SessionEvent::Confirm)
            .expect("confirm");
        assert!(matches!(
            session.handle_event(&mut mesh, SessionEvent::PointerMoved { x: 1.0, y: 0.0 }),
            Err(SessionError::Terminated)
        ));
    }

    #[test]
    fn height_mode_freezes_distance() {
        let mut mesh = selected_quad();
        let mut session = start(&mesh);
        session
            .handle_event(&mut mesh, SessionEvent::PointerMoved { x: 20.0, y: 0.0 })
            .expect("move");
        session
            .handle_event(&mut mesh, SessionEvent::HeightMode(true))
            .expect("mode");
        session
            .handle_event(&mut mesh, SessionEvent::PointerMoved { x: 20.0, y: 30.0 })
            .expect("move");
        assert_relative_eq!(session.params().distance, 0.2);
        assert_relative_eq!(session.params().height, 0.3);
        // The interior face sits at the raised height.
        let raised = (0..mesh.vertex_count() as u32)
            .filter_map(|v| mesh.vertex_position(v))
            .filter(|p| (p.z - 0.3).abs() < 1e-9)
            .count();
        assert_eq!(raised, 4);
    }

    #[test]
    fn new_faces_copy_attributes_and_select_interior() {
        let mut mesh = selected_quad();
        let mut session = start(&mesh);
        session
            .handle_event(&mut mesh, SessionEvent::PointerMoved { x: 20.0, y: 0.0 })
            .expect("move");
        let expected = FaceAttributes::with_material(2).smooth(true);
        let mut selected = 0;
        for f in 0..mesh.face_count() as u32 {
            assert_eq!(mesh.face_attributes(f), Some(expected));
            if mesh.face_selected(f) {
                selected += 1;
            }
        }
        assert_eq!(selected, 1);
    }

    #[test]
    fn toggles_flip_parameters() {
        let mut mesh = selected_quad();
        let mut session = start(&mesh);
        assert!(session.params().region);
        assert!(session.params().quadrangulate);
        session
            .handle_event(&mut mesh, SessionEvent::ToggleRegion)
            .expect("toggle");
        session
            .handle_event(&mut mesh, SessionEvent::ToggleQuadrangulate)
            .expect("toggle");
        assert!(!session.params().region);
        assert!(!session.params().quadrangulate);
    }
}
