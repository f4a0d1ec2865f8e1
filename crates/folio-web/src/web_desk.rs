#![forbid(unsafe_code)]

//! Glue between the drag adapter and the application owner.
//!
//! [`WebDesk`] is what a JS host wraps: DOM pointer events go in, listener
//! commands and a live position come out. Drag commands are applied to the
//! [`DeskApp`] here, so `BringToFront` raises the panel and `Commit` stores
//! and persists the final position. Document listeners for a captured
//! pointer are started and stopped through the app's listener set, which
//! guarantees each is stopped exactly once.
//!
//! Anything that replaces the layout under a running drag (reset, a resize
//! across the mobile boundary, closing the dragged panel) cancels the drag
//! here, so a late release never writes a stale position.

use folio_core::event::{KeyEvent, PointerButton, PointerSample};
use folio_core::{Point, Size};
use folio_layout::{Desk, PanelKey};
use folio_runtime::{
    CancellationToken, Cancelled, DeskApp, FolioConfig, LinkOpener, Listener, StorageBackend,
    SubscriptionCommand, ThemeSink,
};
use folio_widgets::command_palette::{CommandAction, PaletteOutcome};

use crate::drag_capture::{
    DragCommand, DragDispatch, DragState, PanelDragAdapter, PanelDragConfig,
};

/// What the host must do after one pointer signal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebDispatch {
    /// Listener changes to apply, in order.
    pub subscriptions: Vec<SubscriptionCommand>,
    /// Panel and position to render now, while dragging or just committed.
    pub live: Option<(PanelKey, Point)>,
}

/// Desk application plus pointer-capture adapter.
#[derive(Debug)]
pub struct WebDesk {
    app: DeskApp,
    drag: PanelDragAdapter,
}

impl WebDesk {
    pub fn new(config: FolioConfig, storage: Box<dyn StorageBackend>) -> Self {
        let drag = PanelDragAdapter::new(PanelDragConfig::from(&config.drag));
        Self {
            app: DeskApp::new(config, storage),
            drag,
        }
    }

    #[must_use]
    pub fn app(&self) -> &DeskApp {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut DeskApp {
        &mut self.app
    }

    #[must_use]
    pub fn drag(&self) -> &PanelDragAdapter {
        &self.drag
    }

    /// See [`DeskApp::initialize`].
    pub fn initialize(
        &mut self,
        viewport: Size,
        token: &CancellationToken,
    ) -> Result<Vec<SubscriptionCommand>, Cancelled> {
        self.app.initialize(viewport, token)
    }

    /// `pointerdown` on a panel. `button` is the DOM button index.
    pub fn pointer_down(
        &mut self,
        key: PanelKey,
        button: i16,
        sample: PointerSample,
        on_header: bool,
    ) -> WebDispatch {
        let Some(button) = PointerButton::from_dom(button) else {
            return WebDispatch::default();
        };
        let Some(desk) = self.app.desk() else {
            return WebDispatch::default();
        };
        let dispatch = self.drag.pointer_down(desk, key, button, sample, on_header);
        self.apply(dispatch)
    }

    pub fn pointer_move(&mut self, sample: PointerSample) -> WebDispatch {
        let Some(desk) = self.app.desk() else {
            return WebDispatch::default();
        };
        let dispatch = self.drag.pointer_move(desk, sample);
        self.apply(dispatch)
    }

    pub fn pointer_up(&mut self, sample: PointerSample) -> WebDispatch {
        let Some(desk) = self.app.desk() else {
            return WebDispatch::default();
        };
        let dispatch = self.drag.pointer_up(desk, sample);
        self.apply(dispatch)
    }

    pub fn pointer_leave(&mut self, sample: PointerSample) -> WebDispatch {
        let Some(desk) = self.app.desk() else {
            return WebDispatch::default();
        };
        let dispatch = self.drag.pointer_leave(desk, sample);
        self.apply(dispatch)
    }

    pub fn blur(&mut self) -> WebDispatch {
        let dispatch = self.drag.blur();
        self.apply(dispatch)
    }

    pub fn visibility_hidden(&mut self) -> WebDispatch {
        let dispatch = self.drag.visibility_hidden();
        self.apply(dispatch)
    }

    pub fn lost_pointer_capture(&mut self, pointer_id: u32) -> WebDispatch {
        let dispatch = self.drag.lost_pointer_capture(pointer_id);
        self.apply(dispatch)
    }

    /// End any drag, then stop every listener.
    pub fn teardown(&mut self) -> WebDispatch {
        let dispatch = self.drag.teardown();
        let mut out = self.apply(dispatch);
        out.subscriptions.extend(self.app.teardown());
        out
    }

    /// Regenerate the default layout, dropping any drag first.
    pub fn reset_layout(&mut self) -> WebDispatch {
        let out = self.cancel_drag();
        let _ = self.app.reset_layout();
        out
    }

    /// Adapt to a new canvas size. A drag survives a resize within the same
    /// regime and its release clamps to the new canvas; crossing the mobile
    /// boundary cancels it.
    pub fn resize(&mut self, viewport: Size) -> WebDispatch {
        let before = self.app.desk().map(Desk::class);
        let _ = self.app.resize(viewport);
        let after = self.app.desk().map(Desk::class);
        match before.zip(after) {
            Some((from, to)) if from.crosses_regime(to) => self.cancel_drag(),
            _ => self.cancel_if_closed(),
        }
    }

    /// Keyboard input for the palette and its global shortcut.
    pub fn handle_key<H>(&mut self, key: &KeyEvent, host: &mut H) -> (PaletteOutcome, WebDispatch)
    where
        H: ThemeSink + LinkOpener,
    {
        let outcome = self.app.handle_key(key, host);
        let out = self.after_command(&outcome);
        (outcome, out)
    }

    /// Click on the palette row at `index`.
    pub fn click_command<H>(&mut self, index: usize, host: &mut H) -> (PaletteOutcome, WebDispatch)
    where
        H: ThemeSink + LinkOpener,
    {
        let outcome = self.app.click_command(index, host);
        let out = self.after_command(&outcome);
        (outcome, out)
    }

    fn after_command(&mut self, outcome: &PaletteOutcome) -> WebDispatch {
        match outcome {
            PaletteOutcome::Selected(CommandAction::ResetLayout) => self.cancel_drag(),
            _ => self.cancel_if_closed(),
        }
    }

    fn cancel_if_closed(&mut self) -> WebDispatch {
        match self.drag.state() {
            DragState::Dragging { key, .. }
                if self.app.desk().is_some_and(|d| !d.state(key).active) =>
            {
                self.cancel_drag()
            }
            _ => WebDispatch::default(),
        }
    }

    fn cancel_drag(&mut self) -> WebDispatch {
        if self.drag.state() == DragState::Idle {
            return WebDispatch::default();
        }
        let dispatch = self.drag.cancel();
        self.apply(dispatch)
    }

    fn apply(&mut self, dispatch: DragDispatch) -> WebDispatch {
        let mut out = WebDispatch {
            subscriptions: Vec::new(),
            live: dispatch.panel.zip(dispatch.live_position),
        };
        for command in dispatch.commands {
            match command {
                DragCommand::BringToFront(key) => {
                    let _ = self.app.bring_to_front(key);
                }
                DragCommand::AttachDocumentListeners { pointer_id } => {
                    out.subscriptions.extend(
                        [
                            Listener::PointerMove { pointer_id },
                            Listener::PointerUp { pointer_id },
                        ]
                        .into_iter()
                        .filter_map(|l| self.app.start_listener(l)),
                    );
                }
                DragCommand::Commit { key, position } => {
                    if self.app.desk().is_some_and(|d| d.state(key).active) {
                        let _ = self.app.update_position(key, position);
                    } else {
                        tracing::debug!(target: "folio.drag", panel = %key, "commit on closed panel dropped");
                        out.live = None;
                    }
                }
                DragCommand::DetachDocumentListeners { pointer_id } => {
                    out.subscriptions.extend(
                        [
                            Listener::PointerMove { pointer_id },
                            Listener::PointerUp { pointer_id },
                        ]
                        .into_iter()
                        .filter_map(|l| self.app.stop_listener(l)),
                    );
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_runtime::MemoryStorage;
    use pretty_assertions::assert_eq;

    fn ready() -> WebDesk {
        let mut web = WebDesk::new(FolioConfig::default(), Box::new(MemoryStorage::new()));
        let _ = web
            .initialize(Size::new(1440.0, 900.0), &CancellationToken::never())
            .unwrap();
        let _ = web.app_mut().open(PanelKey::About);
        web
    }

    #[test]
    fn pointer_down_before_initialize_is_noop() {
        let mut web = WebDesk::new(FolioConfig::default(), Box::new(MemoryStorage::new()));
        let out = web.pointer_down(PanelKey::About, 0, PointerSample::new(1, Point::ORIGIN, 0.0), true);
        assert_eq!(out, WebDispatch::default());
    }

    #[test]
    fn unknown_dom_button_is_noop() {
        let mut web = ready();
        let out = web.pointer_down(PanelKey::About, 4, PointerSample::new(1, Point::ORIGIN, 0.0), true);
        assert_eq!(out, WebDispatch::default());
        let _ = web.teardown();
    }

    #[test]
    fn drag_start_raises_panel() {
        let mut web = ready();
        let before = web.app().desk().unwrap().highest_z_index();
        let _ = web.pointer_down(PanelKey::About, 0, PointerSample::new(3, Point::new(500.0, 310.0), 0.0), true);
        let desk = web.app().desk().unwrap();
        assert_eq!(desk.highest_z_index(), before + 1);
        assert_eq!(desk.state(PanelKey::About).z_index, before + 1);
        let _ = web.teardown();
    }
}
