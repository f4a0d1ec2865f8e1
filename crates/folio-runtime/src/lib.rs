#![forbid(unsafe_code)]

//! Folio Runtime
//!
//! This crate owns application state for one page and everything that
//! touches the outside world: storage, configuration, the visitor counter,
//! and the listener set the host keeps attached.
//!
//! # Key Components
//!
//! - [`DeskApp`] - Owner of the desk, palette, storage and listeners
//! - [`FolioConfig`] - Tunables loaded from TOML or JSON
//! - [`StorageBackend`] - `localStorage`-shaped key/value trait
//! - [`HostSubscriptions`] - Declarative listener reconcile
//! - [`CancellationToken`] - Cooperative cancellation of the initial load
//! - [`VisitTracker`] - Once-per-day visitor counting
//!
//! # How it fits in the system
//! `folio-layout` and `folio-widgets` are pure state machines. The runtime
//! wires them together, persists what they produce, and turns palette
//! selections into calls on the host's [`ThemeSink`] and [`LinkOpener`].

pub mod app;
pub mod cancellation;
pub mod config;
pub mod state_persistence;
pub mod subscription;
pub mod visit;

pub use app::{DeskApp, LinkOpener, ThemeSink};
pub use cancellation::{CancellationSource, CancellationToken, Cancelled};
pub use config::{ConfigError, DragConfig, FolioConfig, LayoutConfig, PaletteConfig};
#[cfg(feature = "state-persistence")]
pub use state_persistence::FileStorage;
pub use state_persistence::{
    LayoutStore, MemoryStorage, StorageBackend, StorageError, StorageResult,
};
pub use subscription::{HostSubscriptions, Listener, SubId, SubscriptionCommand};
#[cfg(feature = "http")]
pub use visit::HttpVisitCounter;
pub use visit::{
    LAST_VISIT_KEY, ServiceError, VisitBadge, VisitCounter, VisitGate, VisitTracker,
    ordinal_suffix, today_utc,
};
