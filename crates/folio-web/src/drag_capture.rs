#![forbid(unsafe_code)]

//! Deterministic pointer-capture adapter for panel dragging.
//!
//! The browser delivers `pointerdown` on a panel header, then `pointermove`
//! and `pointerup` on the document once the host has attached document-level
//! listeners. This adapter turns those signals into live positions and
//! [`DragCommand`]s while enforcing:
//! - one active pointer at a time,
//! - pinned or closed panels never start a drag,
//! - listeners attached on start are detached exactly once, whichever way
//!   the drag ends (release, leave, blur, hidden tab, lost capture,
//!   teardown).
//!
//! # State machine
//!
//! ```text
//!            pointer_down (header, primary, not pinned)
//!   Idle ─────────────────────────────────────────────► Dragging
//!    ▲                                                    │  pointer_move
//!    │   pointer_up / pointer_leave: momentum, snap,      │  (live position)
//!    │   clamp, Commit + Detach                           │
//!    └────────────────────────────────────────────────────┘
//!        blur / hidden / lost capture / teardown:
//!        Commit(last live position) + Detach
//!        cancel, or release on a panel closed mid-drag:
//!        Detach only
//! ```
//!
//! The adapter never mutates the [`Desk`]; the caller applies the commands.

use folio_core::event::{PointerButton, PointerSample};
use folio_core::motion::{DEFAULT_MOMENTUM_DECAY, DEFAULT_VELOCITY_WINDOW_MS, Momentum, VelocityTracker};
use folio_core::{Point, snap_to_grid};
use folio_layout::{Desk, PanelKey};

/// Adapter configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelDragConfig {
    /// Button required to begin a drag.
    pub activation_button: PointerButton,
    /// Grid pitch applied to live and committed positions, if snapping.
    pub grid_pitch: Option<f64>,
    /// Momentum applied once on release, if enabled.
    pub momentum: Option<Momentum>,
    /// Trailing window for release velocity.
    pub velocity_window_ms: f64,
}

impl Default for PanelDragConfig {
    fn default() -> Self {
        Self {
            activation_button: PointerButton::Primary,
            grid_pitch: None,
            momentum: None,
            velocity_window_ms: DEFAULT_VELOCITY_WINDOW_MS,
        }
    }
}

impl From<&folio_runtime::DragConfig> for PanelDragConfig {
    fn from(config: &folio_runtime::DragConfig) -> Self {
        Self {
            activation_button: PointerButton::Primary,
            grid_pitch: config.grid_snap.then_some(config.grid_pitch),
            momentum: config.momentum.then(|| Momentum::new(config.momentum_decay)),
            velocity_window_ms: config.velocity_window_ms,
        }
    }
}

impl PanelDragConfig {
    /// Snap live and committed positions to a `pitch` grid.
    #[must_use]
    pub fn with_grid(mut self, pitch: f64) -> Self {
        self.grid_pitch = Some(pitch);
        self
    }

    /// Carry release velocity with the default decay.
    #[must_use]
    pub fn with_momentum(mut self) -> Self {
        self.momentum = Some(Momentum::new(DEFAULT_MOMENTUM_DECAY));
        self
    }
}

/// Instruction for the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragCommand {
    /// Raise the panel (drag start gains focus).
    BringToFront(PanelKey),
    /// Attach document-level move/up listeners for this pointer.
    AttachDocumentListeners { pointer_id: u32 },
    /// Persist the final position.
    Commit { key: PanelKey, position: Point },
    /// Remove the listeners attached at drag start.
    DetachDocumentListeners { pointer_id: u32 },
}

/// Lifecycle signal recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerLeave,
    Blur,
    VisibilityHidden,
    LostPointerCapture,
    Teardown,
    Cancel,
}

/// Why a signal was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragIgnoredReason {
    InvalidPointerId,
    ButtonNotAllowed,
    ActivePointerAlreadyInProgress,
    /// Pointer went down on an embedded control, not the header.
    NotOnHeader,
    Pinned,
    PanelInactive,
    NoActivePointer,
    PointerMismatch,
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Started,
    Moved,
    Committed,
    /// Session ended without writing a position.
    Cancelled,
    Ignored(DragIgnoredReason),
}

/// Result of one lifecycle dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct DragDispatch {
    pub phase: DragPhase,
    pub pointer_id: Option<u32>,
    pub panel: Option<PanelKey>,
    pub outcome: DragOutcome,
    /// Position to render right now (not persisted until `Commit`).
    pub live_position: Option<Point>,
    pub commands: Vec<DragCommand>,
}

impl DragDispatch {
    fn ignored(
        phase: DragPhase,
        reason: DragIgnoredReason,
        pointer_id: Option<u32>,
        panel: Option<PanelKey>,
    ) -> Self {
        tracing::trace!(target: "folio.drag", ?phase, ?reason, pointer_id, "ignored");
        Self {
            phase,
            pointer_id,
            panel,
            outcome: DragOutcome::Ignored(reason),
            live_position: None,
            commands: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self.outcome, DragOutcome::Ignored(_))
    }
}

/// Public view of the adapter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging { key: PanelKey, pointer_id: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveDrag {
    key: PanelKey,
    pointer_id: u32,
    start_pointer: Point,
    start_position: Point,
    live: Point,
}

/// Pointer-capture adapter for panel headers.
#[derive(Debug, Clone)]
pub struct PanelDragAdapter {
    config: PanelDragConfig,
    active: Option<ActiveDrag>,
    velocity: VelocityTracker,
}

impl Default for PanelDragAdapter {
    fn default() -> Self {
        Self::new(PanelDragConfig::default())
    }
}

impl PanelDragAdapter {
    #[must_use]
    pub fn new(config: PanelDragConfig) -> Self {
        Self {
            config,
            active: None,
            velocity: VelocityTracker::new(config.velocity_window_ms),
        }
    }

    #[must_use]
    pub const fn config(&self) -> PanelDragConfig {
        self.config
    }

    #[must_use]
    pub fn state(&self) -> DragState {
        match self.active {
            None => DragState::Idle,
            Some(a) => DragState::Dragging {
                key: a.key,
                pointer_id: a.pointer_id,
            },
        }
    }

    #[must_use]
    pub fn active_pointer_id(&self) -> Option<u32> {
        self.active.map(|a| a.pointer_id)
    }

    /// Pointer went down on `key`. `on_header` is false when the target was
    /// an embedded control (pin/minimize/close buttons).
    pub fn pointer_down(
        &mut self,
        desk: &Desk,
        key: PanelKey,
        button: PointerButton,
        sample: PointerSample,
        on_header: bool,
    ) -> DragDispatch {
        let phase = DragPhase::PointerDown;
        let pointer_id = sample.pointer_id;
        let reject = |reason| DragDispatch::ignored(phase, reason, Some(pointer_id), Some(key));

        if pointer_id == 0 {
            return reject(DragIgnoredReason::InvalidPointerId);
        }
        if button != self.config.activation_button {
            return reject(DragIgnoredReason::ButtonNotAllowed);
        }
        if self.active.is_some() {
            return reject(DragIgnoredReason::ActivePointerAlreadyInProgress);
        }
        if !on_header {
            return reject(DragIgnoredReason::NotOnHeader);
        }
        let state = desk.state(key);
        if !state.active {
            return reject(DragIgnoredReason::PanelInactive);
        }
        if state.pinned {
            return reject(DragIgnoredReason::Pinned);
        }

        let start_position = state.position;
        self.active = Some(ActiveDrag {
            key,
            pointer_id,
            start_pointer: sample.position.sanitized(),
            start_position,
            live: start_position,
        });
        self.velocity.clear();
        self.velocity.push(sample.position, sample.timestamp_ms);
        tracing::debug!(target: "folio.drag", panel = %key, pointer_id, "drag start");

        DragDispatch {
            phase,
            pointer_id: Some(pointer_id),
            panel: Some(key),
            outcome: DragOutcome::Started,
            live_position: Some(start_position),
            commands: vec![
                DragCommand::BringToFront(key),
                DragCommand::AttachDocumentListeners { pointer_id },
            ],
        }
    }

    /// Document-level pointer move.
    pub fn pointer_move(&mut self, desk: &Desk, sample: PointerSample) -> DragDispatch {
        let phase = DragPhase::PointerMove;
        let mut active = match self.matching(phase, sample.pointer_id) {
            Ok(active) => active,
            Err(ignored) => return ignored,
        };
        let raw = Self::follow(&active, sample.position);
        let live = desk.clamp(active.key, self.snap(raw));
        active.live = live;
        self.active = Some(active);
        self.velocity.push(sample.position, sample.timestamp_ms);

        DragDispatch {
            phase,
            pointer_id: Some(sample.pointer_id),
            panel: Some(active.key),
            outcome: DragOutcome::Moved,
            live_position: Some(live),
            commands: Vec::new(),
        }
    }

    /// Pointer released.
    pub fn pointer_up(&mut self, desk: &Desk, sample: PointerSample) -> DragDispatch {
        self.release(DragPhase::PointerUp, desk, sample)
    }

    /// Pointer left the document; handled exactly like a release.
    pub fn pointer_leave(&mut self, desk: &Desk, sample: PointerSample) -> DragDispatch {
        self.release(DragPhase::PointerLeave, desk, sample)
    }

    /// Window lost focus.
    pub fn blur(&mut self) -> DragDispatch {
        self.interrupt(DragPhase::Blur, None)
    }

    /// Document became hidden.
    pub fn visibility_hidden(&mut self) -> DragDispatch {
        self.interrupt(DragPhase::VisibilityHidden, None)
    }

    /// Browser revoked pointer capture for `pointer_id`.
    pub fn lost_pointer_capture(&mut self, pointer_id: u32) -> DragDispatch {
        self.interrupt(DragPhase::LostPointerCapture, Some(pointer_id))
    }

    /// Host is unmounting.
    pub fn teardown(&mut self) -> DragDispatch {
        self.interrupt(DragPhase::Teardown, None)
    }

    /// Drop the session without committing. Used when the layout under the
    /// drag is replaced (reset, regime switch).
    pub fn cancel(&mut self) -> DragDispatch {
        let phase = DragPhase::Cancel;
        let Some(active) = self.active.take() else {
            return DragDispatch::ignored(phase, DragIgnoredReason::NoActivePointer, None, None);
        };
        self.velocity.clear();
        tracing::debug!(
            target: "folio.drag",
            panel = %active.key,
            pointer_id = active.pointer_id,
            "drag cancelled"
        );
        DragDispatch {
            phase,
            pointer_id: Some(active.pointer_id),
            panel: Some(active.key),
            outcome: DragOutcome::Cancelled,
            live_position: None,
            commands: vec![DragCommand::DetachDocumentListeners {
                pointer_id: active.pointer_id,
            }],
        }
    }

    fn release(&mut self, phase: DragPhase, desk: &Desk, sample: PointerSample) -> DragDispatch {
        let active = match self.matching(phase, sample.pointer_id) {
            Ok(active) => active,
            Err(ignored) => return ignored,
        };
        if !desk.state(active.key).active {
            let mut dispatch = self.cancel();
            dispatch.phase = phase;
            return dispatch;
        }
        self.velocity.push(sample.position, sample.timestamp_ms);
        let mut position = Self::follow(&active, sample.position);
        if let Some(momentum) = self.config.momentum {
            position = momentum.project(position, self.velocity.velocity());
        }
        let position = desk.clamp(active.key, self.snap(position));
        self.finish(phase, active, position)
    }

    fn interrupt(&mut self, phase: DragPhase, pointer_id: Option<u32>) -> DragDispatch {
        let Some(active) = self.active else {
            return DragDispatch::ignored(phase, DragIgnoredReason::NoActivePointer, pointer_id, None);
        };
        if pointer_id.is_some_and(|id| id != active.pointer_id) {
            return DragDispatch::ignored(
                phase,
                DragIgnoredReason::PointerMismatch,
                pointer_id,
                Some(active.key),
            );
        }
        let live = active.live;
        self.finish(phase, active, live)
    }

    fn finish(&mut self, phase: DragPhase, active: ActiveDrag, position: Point) -> DragDispatch {
        self.active = None;
        self.velocity.clear();
        tracing::debug!(
            target: "folio.drag",
            panel = %active.key,
            pointer_id = active.pointer_id,
            ?phase,
            x = position.x,
            y = position.y,
            "drag end"
        );
        DragDispatch {
            phase,
            pointer_id: Some(active.pointer_id),
            panel: Some(active.key),
            outcome: DragOutcome::Committed,
            live_position: Some(position),
            commands: vec![
                DragCommand::Commit {
                    key: active.key,
                    position,
                },
                DragCommand::DetachDocumentListeners {
                    pointer_id: active.pointer_id,
                },
            ],
        }
    }

    fn matching(&self, phase: DragPhase, pointer_id: u32) -> Result<ActiveDrag, DragDispatch> {
        match self.active {
            None => Err(DragDispatch::ignored(
                phase,
                DragIgnoredReason::NoActivePointer,
                Some(pointer_id),
                None,
            )),
            Some(active) if active.pointer_id != pointer_id => Err(DragDispatch::ignored(
                phase,
                DragIgnoredReason::PointerMismatch,
                Some(pointer_id),
                Some(active.key),
            )),
            Some(active) => Ok(active),
        }
    }

    fn follow(active: &ActiveDrag, pointer: Point) -> Point {
        let (dx, dy) = pointer.sanitized().delta_from(active.start_pointer);
        active.start_position.offset(dx, dy)
    }

    fn snap(&self, position: Point) -> Point {
        match self.config.grid_pitch {
            Some(pitch) => snap_to_grid(position, pitch),
            None => position,
        }
    }
}
