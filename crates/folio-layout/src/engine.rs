#![forbid(unsafe_code)]

//! Default arrangements, reconciliation, and placement of panels.
//!
//! The engine is a pure function of its configuration and the viewport: it
//! never mutates a snapshot in place and never touches storage.
//!
//! # Arrangements
//!
//! - **Centred** (tablet and up): each panel is centred on the viewport and
//!   nudged by a fixed per-panel offset so the default slots fan out rather
//!   than stack exactly.
//! - **Stacked** (mobile): every panel is open and laid out by the host in
//!   [`MOBILE_ORDER`](crate::panel::MOBILE_ORDER); positions are the origin.
//!
//! Every default position is clamped against the viewport before it is
//! returned.
//!
//! # Regime switch
//!
//! Crossing the mobile boundary discards the current layout and returns
//! fresh defaults for the new class. Any other resize only reconciles.

use folio_core::{Point, Rect, Size, clamp_position};
use serde::{Deserialize, Serialize};

use crate::panel::{PanelKey, PanelState, PanelTable};
use crate::responsive::{Breakpoints, Responsive, ViewportClass};
use crate::snapshot::LayoutSnapshot;

/// Per-panel nudge from the centred slot.
const CENTRED_NUDGE: PanelTable<(f64, f64)> = centred_nudge();

const fn centred_nudge() -> PanelTable<(f64, f64)> {
    // Ordered as `PanelKey::ALL`.
    PanelTable::from_slots([
        (0.0, 0.0),
        (50.0, -50.0),
        (-100.0, 0.0),
        (0.0, -60.0),
        (-50.0, -50.0),
        (50.0, -50.0),
    ])
}

/// How a panel being opened picks its position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Placement {
    /// Always reopen at the default slot for the current class.
    #[default]
    FixedSlot,
    /// Walk diagonally from the default slot in `step` increments and take
    /// the first candidate that fits the viewport without overlapping an
    /// open panel. Falls back to the default slot.
    Cascade { step: f64, max_attempts: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arrangement {
    Stacked,
    Centred,
}

/// Computes default and reconciled layouts.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    breakpoints: Breakpoints,
    placement: Placement,
    arrangement: Responsive<Arrangement>,
    starts_open: Responsive<bool>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(Breakpoints::default())
    }
}

impl LayoutEngine {
    #[must_use]
    pub fn new(breakpoints: Breakpoints) -> Self {
        Self {
            breakpoints,
            placement: Placement::FixedSlot,
            arrangement: Responsive::new(Arrangement::Stacked)
                .at(ViewportClass::Tablet, Arrangement::Centred),
            starts_open: Responsive::new(true).at(ViewportClass::Tablet, false),
        }
    }

    /// Select the placement strategy used by [`Self::place`].
    #[must_use]
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub const fn breakpoints(&self) -> &Breakpoints {
        &self.breakpoints
    }

    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }

    /// Class for a viewport.
    #[must_use]
    pub fn classify(&self, viewport: Size) -> ViewportClass {
        self.breakpoints.classify(viewport.width)
    }

    /// Default top-left corner for every panel under `class`.
    #[must_use]
    pub fn default_positions(&self, class: ViewportClass, viewport: Size) -> PanelTable<Point> {
        match self.arrangement.resolve(class) {
            Arrangement::Stacked => PanelTable::from_fn(|_| Point::ORIGIN),
            Arrangement::Centred => {
                let center = viewport.center();
                PanelTable::from_fn(|key| {
                    let dims = key.dimensions();
                    let (dx, dy) = CENTRED_NUDGE[key];
                    let raw = Point::new(
                        center.x - dims.width / 2.0 + dx,
                        center.y - dims.height / 2.0 + dy,
                    );
                    clamp_position(raw, dims, viewport)
                })
            }
        }
    }

    /// A fresh snapshot for `class`: default positions, base z-order, and
    /// every panel open on mobile or closed elsewhere.
    #[must_use]
    pub fn default_snapshot(&self, class: ViewportClass, viewport: Size) -> LayoutSnapshot {
        let open = *self.starts_open.resolve(class);
        let positions = self.default_positions(class, viewport);
        let panels = positions.map(|_, &position| PanelState {
            active: open,
            ..PanelState::closed_at(position)
        });
        LayoutSnapshot::new(class, 1, panels)
    }

    /// Clamp every stored position against `viewport`. Flags and z-order are
    /// preserved.
    #[must_use]
    pub fn reconcile(&self, snapshot: &LayoutSnapshot, viewport: Size) -> LayoutSnapshot {
        let panels = snapshot.panels.map(|key, state| PanelState {
            position: clamp_position(state.position, key.dimensions(), viewport),
            ..*state
        });
        LayoutSnapshot {
            panels,
            viewport_class: self.classify(viewport),
            ..snapshot.clone()
        }
    }

    /// Adapt `snapshot` (produced under `previous`) to a new viewport.
    ///
    /// Returns fresh defaults when the mobile boundary is crossed, otherwise
    /// the reconciled snapshot.
    #[must_use]
    pub fn relayout(
        &self,
        snapshot: &LayoutSnapshot,
        previous: ViewportClass,
        viewport: Size,
    ) -> LayoutSnapshot {
        let next = self.classify(viewport);
        if previous.crosses_regime(next) {
            tracing::debug!(
                target: "folio.layout",
                from = %previous,
                to = %next,
                "layout regime switch, regenerating defaults"
            );
            self.default_snapshot(next, viewport)
        } else {
            self.reconcile(snapshot, viewport)
        }
    }

    /// Position for `key` as it is being opened on top of `snapshot`.
    #[must_use]
    pub fn place(&self, key: PanelKey, snapshot: &LayoutSnapshot, viewport: Size) -> Point {
        let class = self.classify(viewport);
        let slot = self.default_positions(class, viewport)[key];
        match self.placement {
            Placement::FixedSlot => slot,
            Placement::Cascade { step, max_attempts } => {
                cascade(key, slot, step, max_attempts, snapshot, viewport).unwrap_or(slot)
            }
        }
    }
}

fn cascade(
    key: PanelKey,
    slot: Point,
    step: f64,
    max_attempts: u32,
    snapshot: &LayoutSnapshot,
    viewport: Size,
) -> Option<Point> {
    if !(step.is_finite() && step > 0.0) {
        return None;
    }
    let dims = key.dimensions();
    let bounds = Rect::from_size(viewport);
    let occupied: Vec<Rect> = snapshot
        .panels
        .iter()
        .filter(|(other, state)| *other != key && state.active)
        .map(|(other, state)| Rect::from_origin(state.position, other.dimensions()))
        .collect();

    (0..max_attempts)
        .map(|i| {
            let offset = f64::from(i) * step;
            slot.offset(offset, offset)
        })
        .find(|candidate| {
            let rect = Rect::from_origin(*candidate, dims);
            bounds.contains_rect(&rect) && !occupied.iter().any(|o| o.intersects(&rect))
        })
}
