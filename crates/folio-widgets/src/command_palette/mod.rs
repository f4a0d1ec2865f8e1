#![forbid(unsafe_code)]

//! Command palette: catalogue, fuzzy matcher, and overlay state.
//!
//! ```
//! use folio_core::event::{KeyCode, KeyEvent};
//! use folio_widgets::command_palette::{CommandPalette, PaletteOutcome};
//!
//! let mut palette = CommandPalette::default();
//! palette.open();
//! palette.set_query("reset");
//! let outcome = palette.handle_key(&KeyEvent::new(KeyCode::Enter));
//! assert!(matches!(outcome, PaletteOutcome::Selected(_)));
//! assert!(!palette.is_open());
//! ```

mod matcher;
mod registry;
mod state;

pub use matcher::{MatchPolicy, Suggestion, score, suggest};
pub use registry::{Command, CommandAction, CommandGroup, CommandRegistry, LinkConfig, ThemeMode};
pub use state::{
    CommandPalette, DEFAULT_MOUSE_WINDOW, PaletteOutcome, Section, is_toggle_shortcut,
};
