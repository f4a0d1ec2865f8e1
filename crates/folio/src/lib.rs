#![forbid(unsafe_code)]

//! Folio public facade crate.
//!
//! Re-exports the types a host needs from the internal crates, a unified
//! [`FolioError`] with the [`Recovery`] each failure calls for, and a
//! prelude for day-to-day use.
//!
//! ```
//! use folio::prelude::*;
//!
//! let mut app = DeskApp::new(FolioConfig::default(), Box::new(MemoryStorage::new()));
//! app.initialize(Size::new(1440.0, 900.0), &CancellationToken::never())?;
//! let _ = app.toggle(PanelKey::About);
//! assert!(app.desk().is_some_and(|d| d.state(PanelKey::About).active));
//! let _ = app.teardown();
//! # Ok::<(), folio::FolioError>(())
//! ```

mod error;

pub use error::{FolioError, Recovery, Result};

// --- Core re-exports -------------------------------------------------------

pub use folio_core::event::{Event, KeyCode, KeyEvent, Modifiers, PointerButton, PointerSample};
pub use folio_core::{Point, Rect, Size, clamp_position, snap_to_grid};

// --- Layout re-exports -----------------------------------------------------

pub use folio_layout::{
    Breakpoints, Desk, LayoutEngine, LayoutSnapshot, Mutation, PanelError, PanelKey, PanelState,
    Placement, SnapshotError, ViewportClass,
};

// --- Widget re-exports -----------------------------------------------------

pub use folio_widgets::command_palette::{
    CommandAction, CommandPalette, CommandRegistry, PaletteOutcome, ThemeMode,
};

// --- Runtime re-exports ----------------------------------------------------

pub use folio_runtime::{
    CancellationSource, CancellationToken, Cancelled, ConfigError, DeskApp, FolioConfig, LinkOpener,
    MemoryStorage, ServiceError, StorageBackend, StorageError, ThemeSink, VisitBadge,
};

#[cfg(feature = "web")]
pub use folio_web::{PanelDragAdapter, WebDesk, WebDispatch};

pub mod prelude {
    pub use crate::{
        CancellationToken, CommandAction, DeskApp, Event, FolioConfig, FolioError, KeyCode,
        KeyEvent, MemoryStorage, Modifiers, Mutation, PanelKey, Point, Recovery, Result, Size,
        ThemeMode,
    };

    #[cfg(feature = "web")]
    pub use crate::WebDesk;

    pub use crate::{core, layout, runtime, widgets};
}

pub use folio_core as core;
pub use folio_layout as layout;
pub use folio_runtime as runtime;
#[cfg(feature = "web")]
pub use folio_web as web;
pub use folio_widgets as widgets;
