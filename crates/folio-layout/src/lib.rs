#![forbid(unsafe_code)]

//! Panel layout for the Folio desk.
//!
//! # Role in Folio
//! This crate owns everything about *where* panels are and *which* ones are
//! showing: the closed panel catalogue, viewport classes, the default
//! arrangements per class, the persisted snapshot format, and the [`Desk`]
//! that applies open/close/drag/z-order transitions.
//!
//! # How it fits in the system
//! `folio-runtime` owns a [`Desk`] and persists its [`LayoutSnapshot`] after
//! every mutation. `folio-web` reads panel dimensions and pinned state from
//! here when running a drag session. Nothing in this crate performs I/O.

pub mod desk;
pub mod engine;
pub mod panel;
pub mod responsive;
pub mod snapshot;

pub use desk::{Desk, Mutation};
pub use engine::{LayoutEngine, Placement};
pub use panel::{PanelError, PanelKey, PanelSpec, PanelState, PanelTable};
pub use responsive::{Breakpoints, Responsive, ViewportClass};
pub use snapshot::{
    LAYOUT_SCHEMA_VERSION, LayoutSnapshot, SnapshotError, SnapshotLoad, STORAGE_KEY,
};
