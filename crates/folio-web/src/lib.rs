#![forbid(unsafe_code)]

//! `folio-web` is the browser-facing edge of the Folio desk.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding JS forwards DOM pointer events with
//!   their timestamps; nothing here reads a clock or touches the DOM.
//! - **Explicit listener lifecycle**: document-level listeners are requested
//!   and released through commands, each released exactly once.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.

pub mod drag_capture;
pub mod web_desk;

pub use drag_capture::{
    DragCommand, DragDispatch, DragIgnoredReason, DragOutcome, DragPhase, DragState,
    PanelDragAdapter, PanelDragConfig,
};
pub use web_desk::{WebDesk, WebDispatch};
