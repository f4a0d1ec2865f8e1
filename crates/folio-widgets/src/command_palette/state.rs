#![forbid(unsafe_code)]

//! Palette overlay state: query, visible sections, cursor, and the
//! keyboard/mouse arbitration between them.
//!
//! # Invariants
//!
//! 1. The cursor indexes the flattened visible list and is reset to 0 on
//!    every query change and every open.
//! 2. Arrow keys clamp at the list bounds; they never wrap.
//! 3. Hover moves the cursor only while the mouse window is armed; arrow
//!    keys disarm it.
//! 4. Selecting a command (by Enter or click) closes the palette and clears
//!    the query. So does Escape.
//!
//! Time is supplied by the caller so the mouse window can be driven
//! deterministically.

use std::time::Duration;

use folio_core::event::{KeyCode, KeyEvent, Modifiers};
use web_time::Instant;

use super::matcher::{MatchPolicy, suggest};
use super::registry::{Command, CommandAction, CommandGroup, CommandRegistry};

/// Default length of the mouse-control window.
pub const DEFAULT_MOUSE_WINDOW: Duration = Duration::from_millis(1500);

/// Result of feeding an event to the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteOutcome {
    /// The palette is closed or did not react.
    Ignored,
    /// The palette handled the event and stays open.
    Consumed,
    /// The palette closed without selecting anything.
    Closed,
    /// A command was chosen; the palette has closed.
    Selected(CommandAction),
}

/// A non-empty group of visible commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub group: CommandGroup,
    /// Catalogue indices in rank order.
    pub items: Vec<usize>,
}

impl Section {
    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.group.title()
    }
}

/// Whether `key` is the global shortcut that toggles the palette:
/// `Ctrl+K` or a bare `/`.
#[must_use]
pub fn is_toggle_shortcut(key: &KeyEvent) -> bool {
    (key.ctrl() && matches!(key.code, KeyCode::Char('k' | 'K'))) || key.is_char('/')
}

/// Command palette state machine.
#[derive(Debug, Clone)]
pub struct CommandPalette {
    registry: CommandRegistry,
    policy: MatchPolicy,
    mouse_window: Duration,
    open: bool,
    query: String,
    sections: Vec<Section>,
    visible: Vec<usize>,
    cursor: usize,
    mouse_until: Option<Instant>,
}

impl CommandPalette {
    #[must_use]
    pub fn new(registry: CommandRegistry) -> Self {
        let mut palette = Self {
            registry,
            policy: MatchPolicy::default(),
            mouse_window: DEFAULT_MOUSE_WINDOW,
            open: false,
            query: String::new(),
            sections: Vec::new(),
            visible: Vec::new(),
            cursor: 0,
            mouse_until: None,
        };
        palette.refresh();
        palette
    }

    #[must_use]
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self.refresh();
        self
    }

    #[must_use]
    pub fn with_mouse_window(mut self, window: Duration) -> Self {
        self.mouse_window = window;
        self
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Visible groups in display order. Empty groups are omitted.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Visible commands flattened in render order.
    pub fn visible(&self) -> impl Iterator<Item = &Command> {
        self.visible
            .iter()
            .filter_map(|&i| self.registry.get(i))
    }

    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Command under the cursor.
    #[must_use]
    pub fn highlighted(&self) -> Option<&Command> {
        self.visible
            .get(self.cursor)
            .and_then(|&i| self.registry.get(i))
    }

    pub fn open(&mut self) {
        self.open = true;
        self.cursor = 0;
        tracing::debug!(target: "folio.palette", "palette opened");
    }

    /// Close and clear the query.
    pub fn close(&mut self) {
        self.open = false;
        self.mouse_until = None;
        self.set_query(String::new());
        tracing::debug!(target: "folio.palette", "palette closed");
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Replace the query text, re-rank, and reset the cursor.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.cursor = 0;
        self.refresh();
    }

    /// Handle a key while the palette has focus.
    pub fn handle_key(&mut self, key: &KeyEvent) -> PaletteOutcome {
        if !self.open {
            return PaletteOutcome::Ignored;
        }
        match key.code {
            KeyCode::Down => {
                self.step_cursor(1);
                PaletteOutcome::Consumed
            }
            KeyCode::Up => {
                self.step_cursor(-1);
                PaletteOutcome::Consumed
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Escape => {
                self.close();
                PaletteOutcome::Closed
            }
            KeyCode::Tab => {
                self.complete();
                PaletteOutcome::Consumed
            }
            KeyCode::Backspace => {
                let mut q = std::mem::take(&mut self.query);
                q.pop();
                self.set_query(q);
                PaletteOutcome::Consumed
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::SUPER) =>
            {
                let mut q = std::mem::take(&mut self.query);
                q.push(c);
                self.set_query(q);
                PaletteOutcome::Consumed
            }
            _ => PaletteOutcome::Ignored,
        }
    }

    /// Record real mouse movement over the list at `now`.
    pub fn mouse_moved(&mut self, now: Instant) {
        self.mouse_until = Some(now + self.mouse_window);
    }

    /// Whether hover currently controls the cursor.
    #[must_use]
    pub fn mouse_active(&self, now: Instant) -> bool {
        self.mouse_until.is_some_and(|until| now < until)
    }

    /// Pointer entered the visible item at `index`. Moves the cursor only
    /// while the mouse window is armed; returns whether it moved.
    pub fn hover(&mut self, index: usize, now: Instant) -> bool {
        if !self.mouse_active(now) || index >= self.visible.len() {
            return false;
        }
        self.cursor = index;
        true
    }

    /// Click on the visible item at `index`.
    pub fn click(&mut self, index: usize) -> PaletteOutcome {
        match self.visible.get(index).copied() {
            Some(catalogue) if self.open => self.select(catalogue),
            _ => PaletteOutcome::Ignored,
        }
    }

    fn step_cursor(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        self.mouse_until = None;
        let last = self.visible.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    fn submit(&mut self) -> PaletteOutcome {
        if let Some(index) = self.registry.position_exact(&self.query) {
            return self.select(index);
        }
        match self.visible.get(self.cursor).copied() {
            Some(index) => self.select(index),
            None => PaletteOutcome::Consumed,
        }
    }

    fn complete(&mut self) {
        if self.query.is_empty() {
            return;
        }
        let prefix = self.query.to_lowercase();
        let unique = {
            let mut matches = self
                .registry
                .commands()
                .iter()
                .map(|c| c.key)
                .filter(|k| k.starts_with(prefix.as_str()));
            match (matches.next(), matches.next()) {
                (Some(only), None) => Some(only),
                _ => None,
            }
        };
        if let Some(key) = unique {
            self.set_query(key);
        }
    }

    fn select(&mut self, index: usize) -> PaletteOutcome {
        let Some(command) = self.registry.get(index) else {
            self.set_query(String::new());
            return PaletteOutcome::Consumed;
        };
        let action = command.action.clone();
        tracing::info!(target: "folio.palette", command = command.key, "command selected");
        self.close();
        PaletteOutcome::Selected(action)
    }

    fn refresh(&mut self) {
        let ranked = suggest(&self.registry, &self.query, self.policy);
        let commands = self.registry.commands();
        self.sections = CommandGroup::ALL
            .into_iter()
            .filter_map(|group| {
                let items: Vec<usize> = ranked
                    .iter()
                    .map(|s| s.index)
                    .filter(|&i| commands[i].group == group)
                    .collect();
                (!items.is_empty()).then_some(Section { group, items })
            })
            .collect();
        self.visible = self
            .sections
            .iter()
            .flat_map(|s| s.items.iter().copied())
            .collect();
    }
}

impl Default for CommandPalette {
    fn default() -> Self {
        Self::new(CommandRegistry::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_layout::PanelKey;

    use crate::command_palette::registry::ThemeMode;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code)
    }

    fn typed(text: &str) -> CommandPalette {
        let mut p = CommandPalette::default();
        p.open();
        for c in text.chars() {
            let _ = p.handle_key(&key(KeyCode::Char(c)));
        }
        p
    }

    fn visible_keys(p: &CommandPalette) -> Vec<&'static str> {
        p.visible().map(|c| c.key).collect()
    }

    #[test]
    fn closed_palette_ignores_keys() {
        let mut p = CommandPalette::default();
        assert_eq!(p.handle_key(&key(KeyCode::Down)), PaletteOutcome::Ignored);
    }

    #[test]
    fn empty_query_shows_every_section() {
        let p = typed("");
        let titles: Vec<_> = p.sections().iter().map(Section::title).collect();
        assert_eq!(titles, ["Menu", "Appearance", "Tools", "Social", "System"]);
        assert_eq!(p.visible_len(), 15);
    }

    #[test]
    fn typing_filters_and_drops_empty_sections() {
        let p = typed("dark");
        assert_eq!(visible_keys(&p), ["dark"]);
        assert_eq!(p.sections().len(), 1);
        assert_eq!(p.sections()[0].group, CommandGroup::Appearance);
    }

    #[test]
    fn sections_keep_group_order_with_rank_inside() {
        let p = typed("li");
        let keys = visible_keys(&p);
        let light = keys.iter().position(|k| *k == "light").unwrap();
        let linkedin = keys.iter().position(|k| *k == "linkedin").unwrap();
        assert!(light < linkedin);
    }

    #[test]
    fn arrows_clamp_without_wrapping() {
        let mut p = typed("");
        let _ = p.handle_key(&key(KeyCode::Up));
        assert_eq!(p.cursor(), 0);
        for _ in 0..40 {
            let _ = p.handle_key(&key(KeyCode::Down));
        }
        assert_eq!(p.cursor(), 14);
        assert_eq!(p.highlighted().unwrap().key, "downloadcv");
    }

    #[test]
    fn query_change_resets_cursor() {
        let mut p = typed("");
        let _ = p.handle_key(&key(KeyCode::Down));
        let _ = p.handle_key(&key(KeyCode::Down));
        assert_eq!(p.cursor(), 2);
        let _ = p.handle_key(&key(KeyCode::Char('a')));
        assert_eq!(p.cursor(), 0);
    }

    #[test]
    fn enter_prefers_exact_key_over_cursor() {
        let mut p = typed("stack");
        let _ = p.handle_key(&key(KeyCode::Down));
        assert_eq!(
            p.handle_key(&key(KeyCode::Enter)),
            PaletteOutcome::Selected(CommandAction::TogglePanel(PanelKey::Stack))
        );
        assert!(!p.is_open());
        assert_eq!(p.query(), "");
    }

    #[test]
    fn enter_exact_match_ignores_case() {
        let mut p = CommandPalette::default();
        p.open();
        p.set_query("Light");
        assert_eq!(
            p.handle_key(&key(KeyCode::Enter)),
            PaletteOutcome::Selected(CommandAction::SetTheme(ThemeMode::Light))
        );
    }

    #[test]
    fn enter_selects_highlighted_otherwise() {
        let mut p = typed("");
        let _ = p.handle_key(&key(KeyCode::Down));
        assert_eq!(
            p.handle_key(&key(KeyCode::Enter)),
            PaletteOutcome::Selected(CommandAction::TogglePanel(PanelKey::Projects))
        );
    }

    #[test]
    fn enter_with_nothing_visible_stays_open() {
        let mut p = typed("qqq");
        assert_eq!(p.visible_len(), 0);
        assert_eq!(p.handle_key(&key(KeyCode::Enter)), PaletteOutcome::Consumed);
        assert!(p.is_open());
    }

    #[test]
    fn escape_closes_and_clears() {
        let mut p = typed("abo");
        assert_eq!(p.handle_key(&key(KeyCode::Escape)), PaletteOutcome::Closed);
        assert!(!p.is_open());
        assert_eq!(p.query(), "");
    }

    #[test]
    fn tab_completes_unique_prefix_only() {
        let mut p = typed("exp");
        let _ = p.handle_key(&key(KeyCode::Tab));
        assert_eq!(p.query(), "experience");

        let mut p = typed("l");
        let _ = p.handle_key(&key(KeyCode::Tab));
        assert_eq!(p.query(), "l");
    }

    #[test]
    fn backspace_edits_query() {
        let mut p = typed("abx");
        let _ = p.handle_key(&key(KeyCode::Backspace));
        assert_eq!(p.query(), "ab");
    }

    #[test]
    fn hover_needs_recent_mouse_movement() {
        let mut p = typed("");
        let t0 = Instant::now();
        assert!(!p.hover(3, t0));
        p.mouse_moved(t0);
        assert!(p.hover(3, t0 + Duration::from_millis(200)));
        assert_eq!(p.cursor(), 3);
        assert!(!p.hover(5, t0 + Duration::from_millis(1500)));
        assert_eq!(p.cursor(), 3);
    }

    #[test]
    fn arrow_keys_take_control_from_mouse() {
        let mut p = typed("");
        let t0 = Instant::now();
        p.mouse_moved(t0);
        let _ = p.handle_key(&key(KeyCode::Down));
        assert!(!p.mouse_active(t0));
        assert!(!p.hover(6, t0));
        assert_eq!(p.cursor(), 1);
    }

    #[test]
    fn click_selects_visible_item() {
        let mut p = typed("git");
        let outcome = p.click(0);
        assert_eq!(
            outcome,
            PaletteOutcome::Selected(CommandAction::OpenUrl("https://github.com/luvp21".into()))
        );
        assert!(!p.is_open());
    }

    #[test]
    fn ctrl_chars_do_not_edit_query() {
        let mut p = typed("ab");
        let ctrl_a = KeyEvent::new(KeyCode::Char('a')).with_modifiers(Modifiers::CTRL);
        assert_eq!(p.handle_key(&ctrl_a), PaletteOutcome::Ignored);
        assert_eq!(p.query(), "ab");
    }

    #[test]
    fn toggle_shortcuts() {
        let ctrl_k = KeyEvent::new(KeyCode::Char('k')).with_modifiers(Modifiers::CTRL);
        assert!(is_toggle_shortcut(&ctrl_k));
        assert!(is_toggle_shortcut(&KeyEvent::new(KeyCode::Char('/'))));
        assert!(!is_toggle_shortcut(&KeyEvent::new(KeyCode::Char('k'))));
    }
}
