#![forbid(unsafe_code)]

//! Interactive widgets for the Folio desk.
//!
//! Currently this is the command palette: a static command catalogue, a
//! fuzzy scorer, and the keyboard/mouse state of the palette overlay. The
//! host renders [`command_palette::CommandPalette::sections`] and forwards
//! key and pointer events; selected commands come back as
//! [`command_palette::CommandAction`] values for the runtime to dispatch.

pub mod command_palette;

pub use command_palette::{
    Command, CommandAction, CommandGroup, CommandPalette, CommandRegistry, LinkConfig,
    MatchPolicy, PaletteOutcome, ThemeMode, score,
};
