#![forbid(unsafe_code)]

//! The panel model: state transitions over a [`LayoutSnapshot`].
//!
//! A [`Desk`] owns the current snapshot, the viewport it is laid out
//! against, and the [`LayoutEngine`] that supplies defaults. Every operation
//! is synchronous and returns a [`Mutation`] so the owner knows whether to
//! persist.
//!
//! # Invariants
//!
//! 1. `highest_z_index` starts at 1 and only grows until [`Desk::reset_all`].
//! 2. Each focus-gaining operation ([`Desk::open`], [`Desk::toggle`],
//!    [`Desk::bring_to_front`]) assigns `highest_z_index + 1` to the panel and
//!    increments the counter by exactly one.
//! 3. Every stored position is clamped against the current viewport after
//!    each operation.
//! 4. `minimized` and `pinned` are independent of each other and of z-order.
//!
//! # Reopening
//!
//! Closing a panel does not remember its manual position: opening it again
//! (by `open` or `toggle`) asks the engine for a fresh placement.

use folio_core::{Point, Size, clamp_position};

use crate::engine::LayoutEngine;
use crate::panel::{PanelError, PanelKey, PanelState};
use crate::responsive::ViewportClass;
use crate::snapshot::LayoutSnapshot;

/// Whether an operation altered the snapshot.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Unchanged,
    Changed,
}

impl Mutation {
    #[must_use]
    pub const fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }

    const fn from_changed(changed: bool) -> Self {
        if changed { Self::Changed } else { Self::Unchanged }
    }
}

/// Panel model bound to a viewport.
#[derive(Debug, Clone)]
pub struct Desk {
    engine: LayoutEngine,
    viewport: Size,
    snapshot: LayoutSnapshot,
}

impl Desk {
    /// Fresh desk with the default layout for `viewport`.
    #[must_use]
    pub fn new(engine: LayoutEngine, viewport: Size) -> Self {
        let class = engine.classify(viewport);
        let snapshot = engine.default_snapshot(class, viewport);
        Self {
            engine,
            viewport,
            snapshot,
        }
    }

    /// Desk resuming a stored snapshot.
    ///
    /// The snapshot is reconciled against `viewport`, or replaced by defaults
    /// when it was produced on the other side of the mobile boundary.
    #[must_use]
    pub fn restore(engine: LayoutEngine, viewport: Size, snapshot: &LayoutSnapshot) -> Self {
        let snapshot = engine.relayout(snapshot, snapshot.viewport_class, viewport);
        Self {
            engine,
            viewport,
            snapshot,
        }
    }

    #[must_use]
    pub const fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    #[must_use]
    pub const fn snapshot(&self) -> &LayoutSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub const fn class(&self) -> ViewportClass {
        self.snapshot.viewport_class
    }

    #[must_use]
    pub const fn highest_z_index(&self) -> u32 {
        self.snapshot.highest_z_index
    }

    #[must_use]
    pub fn state(&self, key: PanelKey) -> &PanelState {
        &self.snapshot.panels[key]
    }

    /// Whether this layout should be written to storage. Mobile layouts are
    /// always regenerated, never saved.
    #[must_use]
    pub const fn is_persistable(&self) -> bool {
        !self.class().is_mobile()
    }

    /// Open `key`, or raise it if already open.
    pub fn open(&mut self, key: PanelKey) -> Mutation {
        if self.snapshot.panels[key].active {
            self.bump(key);
        } else {
            self.reopen(key);
        }
        tracing::debug!(target: "folio.desk", panel = %key, z = self.state(key).z_index, "open");
        Mutation::Changed
    }

    /// Close `key`. Its manual position is not retained.
    pub fn close(&mut self, key: PanelKey) -> Mutation {
        let state = &mut self.snapshot.panels[key];
        if !state.active {
            return Mutation::Unchanged;
        }
        state.active = false;
        tracing::debug!(target: "folio.desk", panel = %key, "close");
        Mutation::Changed
    }

    /// Open a closed panel at a fresh placement, or close an open one.
    /// Either way the panel is restored from minimized and raised.
    pub fn toggle(&mut self, key: PanelKey) -> Mutation {
        if self.snapshot.panels[key].active {
            let state = &mut self.snapshot.panels[key];
            state.active = false;
            state.minimized = false;
            self.bump(key);
        } else {
            self.reopen(key);
        }
        tracing::debug!(
            target: "folio.desk",
            panel = %key,
            active = self.state(key).active,
            z = self.state(key).z_index,
            "toggle"
        );
        Mutation::Changed
    }

    /// Flip `minimized`.
    pub fn minimize(&mut self, key: PanelKey) -> Mutation {
        let state = &mut self.snapshot.panels[key];
        state.minimized = !state.minimized;
        Mutation::Changed
    }

    /// Set `pinned`.
    pub fn pin(&mut self, key: PanelKey, pinned: bool) -> Mutation {
        let state = &mut self.snapshot.panels[key];
        let changed = state.pinned != pinned;
        state.pinned = pinned;
        Mutation::from_changed(changed)
    }

    /// Clamp `position` against the viewport and store it.
    pub fn update_position(&mut self, key: PanelKey, position: Point) -> Mutation {
        let clamped = self.clamp(key, position);
        let state = &mut self.snapshot.panels[key];
        let changed = state.position != clamped;
        state.position = clamped;
        Mutation::from_changed(changed)
    }

    /// Raise `key` above every other panel.
    pub fn bring_to_front(&mut self, key: PanelKey) -> Mutation {
        self.bump(key);
        Mutation::Changed
    }

    /// Discard the layout and regenerate defaults for the current viewport.
    pub fn reset_all(&mut self) -> Mutation {
        let class = self.engine.classify(self.viewport);
        self.snapshot = self.engine.default_snapshot(class, self.viewport);
        tracing::info!(target: "folio.desk", class = %class, "layout reset");
        Mutation::Changed
    }

    /// Adapt to a new viewport size.
    pub fn resize(&mut self, viewport: Size) -> Mutation {
        let next = self
            .engine
            .relayout(&self.snapshot, self.snapshot.viewport_class, viewport);
        self.viewport = viewport;
        let changed = next != self.snapshot;
        self.snapshot = next;
        Mutation::from_changed(changed)
    }

    /// Clamp `position` for `key` against the current viewport.
    #[must_use]
    pub fn clamp(&self, key: PanelKey, position: Point) -> Point {
        clamp_position(position, key.dimensions(), self.viewport)
    }

    /// [`Self::open`] addressed by string id.
    pub fn open_by_id(&mut self, id: &str) -> Result<Mutation, PanelError> {
        Ok(self.open(lookup(id)?))
    }

    /// [`Self::close`] addressed by string id.
    pub fn close_by_id(&mut self, id: &str) -> Result<Mutation, PanelError> {
        Ok(self.close(lookup(id)?))
    }

    /// [`Self::toggle`] addressed by string id.
    pub fn toggle_by_id(&mut self, id: &str) -> Result<Mutation, PanelError> {
        Ok(self.toggle(lookup(id)?))
    }

    fn reopen(&mut self, key: PanelKey) {
        let position = self.engine.place(key, &self.snapshot, self.viewport);
        let state = &mut self.snapshot.panels[key];
        state.active = true;
        state.minimized = false;
        state.position = position;
        self.bump(key);
    }

    fn bump(&mut self, key: PanelKey) {
        let z = self.snapshot.highest_z_index.saturating_add(1);
        self.snapshot.highest_z_index = z;
        self.snapshot.panels[key].z_index = z;
    }
}

fn lookup(id: &str) -> Result<PanelKey, PanelError> {
    id.parse::<PanelKey>().inspect_err(|err| {
        tracing::error!(target: "folio.desk", error = %err, "panel operation on unknown key");
    })
}
