#![forbid(unsafe_code)]

//! Host listener subscriptions.
//!
//! The library never touches the DOM. Instead the owner declares which
//! listeners it needs (window resize, keyboard, document-level pointer
//! tracking during a drag) and [`HostSubscriptions::reconcile`] diffs that
//! declaration against what is running, producing [`SubscriptionCommand`]s
//! for the host to apply.
//!
//! # Invariants
//!
//! 1. A listener is started at most once while it stays declared.
//! 2. Every started listener is stopped exactly once: when it drops out of a
//!    declaration, on [`HostSubscriptions::stop_all`], or never again after
//!    that.
//! 3. Commands are emitted stops first, then starts, each in declaration
//!    order, so the host never holds two listeners for the same id.

use std::collections::BTreeSet;

/// Stable identifier for a host listener.
pub type SubId = u64;

/// A DOM listener the host attaches on the library's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Listener {
    /// `resize` on the window.
    Resize,
    /// `keydown` on the document (palette shortcut and navigation).
    KeyDown,
    /// `blur` on the window.
    Blur,
    /// `visibilitychange` on the document.
    Visibility,
    /// Document-level `pointermove` for one captured pointer.
    PointerMove { pointer_id: u32 },
    /// Document-level `pointerup` / `pointercancel` for one captured pointer.
    PointerUp { pointer_id: u32 },
}

impl Listener {
    /// Deterministic id; pointer listeners carry their pointer id.
    #[must_use]
    pub const fn id(self) -> SubId {
        match self {
            Self::Resize => 1,
            Self::KeyDown => 2,
            Self::Blur => 3,
            Self::Visibility => 4,
            Self::PointerMove { pointer_id } => (1 << 32) | pointer_id as u64,
            Self::PointerUp { pointer_id } => (2 << 32) | pointer_id as u64,
        }
    }
}

/// Instruction for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionCommand {
    Start(Listener),
    Stop(Listener),
}

/// Tracks which host listeners are live.
#[derive(Debug, Default)]
pub struct HostSubscriptions {
    active: Vec<Listener>,
    stopped_total: u64,
}

impl HostSubscriptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Listeners currently running, in start order.
    #[must_use]
    pub fn active(&self) -> &[Listener] {
        &self.active
    }

    #[must_use]
    pub fn is_active(&self, listener: Listener) -> bool {
        self.active.iter().any(|l| l.id() == listener.id())
    }

    /// Number of stops issued since creation.
    #[must_use]
    pub const fn stopped_total(&self) -> u64 {
        self.stopped_total
    }

    /// Diff `desired` against the running set.
    pub fn reconcile(
        &mut self,
        desired: impl IntoIterator<Item = Listener>,
    ) -> Vec<SubscriptionCommand> {
        let mut wanted: Vec<Listener> = Vec::new();
        let mut seen = BTreeSet::new();
        for listener in desired {
            if seen.insert(listener.id()) {
                wanted.push(listener);
            }
        }

        let mut commands = Vec::new();
        let mut remaining = Vec::with_capacity(self.active.len());
        for running in self.active.drain(..) {
            if seen.contains(&running.id()) {
                remaining.push(running);
            } else {
                tracing::debug!(target: "folio.runtime", sub_id = running.id(), ?running, "stopping listener");
                self.stopped_total += 1;
                commands.push(SubscriptionCommand::Stop(running));
            }
        }
        self.active = remaining;

        for listener in wanted {
            if self.is_active(listener) {
                continue;
            }
            tracing::debug!(target: "folio.runtime", sub_id = listener.id(), ?listener, "starting listener");
            self.active.push(listener);
            commands.push(SubscriptionCommand::Start(listener));
        }
        commands
    }

    /// Start a single listener unless it is already running.
    pub fn start(&mut self, listener: Listener) -> Option<SubscriptionCommand> {
        if self.is_active(listener) {
            return None;
        }
        self.active.push(listener);
        Some(SubscriptionCommand::Start(listener))
    }

    /// Stop a single listener if it is running.
    pub fn stop(&mut self, listener: Listener) -> Option<SubscriptionCommand> {
        let pos = self.active.iter().position(|l| l.id() == listener.id())?;
        let running = self.active.remove(pos);
        self.stopped_total += 1;
        Some(SubscriptionCommand::Stop(running))
    }

    /// Stop everything. Subsequent calls return nothing.
    pub fn stop_all(&mut self) -> Vec<SubscriptionCommand> {
        let stopped: Vec<_> = self
            .active
            .drain(..)
            .map(SubscriptionCommand::Stop)
            .collect();
        self.stopped_total += stopped.len() as u64;
        stopped
    }
}

impl Drop for HostSubscriptions {
    fn drop(&mut self) {
        if !self.active.is_empty() {
            tracing::warn!(
                target: "folio.runtime",
                leaked = self.active.len(),
                "host subscriptions dropped without teardown"
            );
        }
    }
}
