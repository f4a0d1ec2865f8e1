#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! The browser host translates DOM `KeyboardEvent` / `PointerEvent` values
//! into these types before handing them to the runtime. All events derive
//! `Clone` and `PartialEq` for use in tests and pattern matching.
//!
//! # Design Notes
//!
//! - Pointer coordinates are canvas-relative CSS pixels.
//! - Pointer timestamps are the DOM `event.timeStamp` in milliseconds; they
//!   are only compared with each other, never with wall-clock time.
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;

use crate::geometry::Point;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// The canvas was resized.
    Resize {
        /// New canvas width in CSS pixels.
        width: f64,
        /// New canvas height in CSS pixels.
        height: f64,
    },

    /// Window focus gained (`true`) or lost (`false`).
    Focus(bool),
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if this is a specific character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Translate a DOM `KeyboardEvent.key` value.
    ///
    /// Returns `None` for keys the desk does not react to (function keys,
    /// media keys, bare modifiers, ...).
    #[must_use]
    pub fn from_dom_key(key: &str, modifiers: Modifiers) -> Option<Self> {
        let code = match key {
            "Enter" => KeyCode::Enter,
            "Escape" | "Esc" => KeyCode::Escape,
            "Backspace" => KeyCode::Backspace,
            "Tab" if modifiers.contains(Modifiers::SHIFT) => KeyCode::BackTab,
            "Tab" => KeyCode::Tab,
            "ArrowUp" | "Up" => KeyCode::Up,
            "ArrowDown" | "Down" => KeyCode::Down,
            "ArrowLeft" | "Left" => KeyCode::Left,
            "ArrowRight" | "Right" => KeyCode::Right,
            "Home" => KeyCode::Home,
            "End" => KeyCode::End,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(Self { code, modifiers })
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    /// Shift+Tab.
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

bitflags! {
    /// Modifier keys that can be held during a key or pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        /// Super/Meta/Cmd.
        const SUPER = 0b1000;
    }
}

impl Modifiers {
    /// Build from the four DOM boolean flags.
    #[must_use]
    pub fn from_dom(shift: bool, alt: bool, ctrl: bool, meta: bool) -> Self {
        let mut m = Self::NONE;
        m.set(Self::SHIFT, shift);
        m.set(Self::ALT, alt);
        m.set(Self::CTRL, ctrl);
        m.set(Self::SUPER, meta);
        m
    }
}

/// Pointer button that triggered a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    /// Map the DOM `PointerEvent.button` index.
    #[must_use]
    pub const fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// One pointer observation: where the pointer was and when.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub pointer_id: u32,
    pub position: Point,
    /// DOM timestamp in milliseconds.
    pub timestamp_ms: f64,
}

impl PointerSample {
    #[must_use]
    pub const fn new(pointer_id: u32, position: Point, timestamp_ms: f64) -> Self {
        Self {
            pointer_id,
            position,
            timestamp_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_arrow_keys_map() {
        let up = KeyEvent::from_dom_key("ArrowUp", Modifiers::NONE).unwrap();
        assert_eq!(up.code, KeyCode::Up);
        let down = KeyEvent::from_dom_key("ArrowDown", Modifiers::NONE).unwrap();
        assert_eq!(down.code, KeyCode::Down);
    }

    #[test]
    fn dom_single_char_maps_to_char() {
        let k = KeyEvent::from_dom_key("k", Modifiers::CTRL).unwrap();
        assert!(k.is_char('k'));
        assert!(k.ctrl());
    }

    #[test]
    fn dom_named_unknown_key_is_dropped() {
        assert_eq!(KeyEvent::from_dom_key("F5", Modifiers::NONE), None);
        assert_eq!(KeyEvent::from_dom_key("Shift", Modifiers::SHIFT), None);
    }

    #[test]
    fn shift_tab_is_back_tab() {
        let k = KeyEvent::from_dom_key("Tab", Modifiers::SHIFT).unwrap();
        assert_eq!(k.code, KeyCode::BackTab);
    }

    #[test]
    fn modifiers_from_dom_flags() {
        let m = Modifiers::from_dom(true, false, true, false);
        assert!(m.contains(Modifiers::SHIFT | Modifiers::CTRL));
        assert!(!m.contains(Modifiers::ALT));
    }

    #[test]
    fn pointer_button_from_dom() {
        assert_eq!(PointerButton::from_dom(0), Some(PointerButton::Primary));
        assert_eq!(PointerButton::from_dom(2), Some(PointerButton::Secondary));
        assert_eq!(PointerButton::from_dom(7), None);
    }
}
