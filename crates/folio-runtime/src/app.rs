#![forbid(unsafe_code)]

//! The application-state owner.
//!
//! [`DeskApp`] bundles the [`Desk`], the command palette, storage, and the
//! host listener set. The host creates one per page, calls
//! [`DeskApp::initialize`] once the canvas has a size, forwards events, and
//! calls [`DeskApp::teardown`] on unmount. There is no global state.
//!
//! # Lifecycle
//!
//! ```text
//!   new ──► initialize(viewport, token) ──► events… ──► teardown
//!                │ cancelled
//!                ▼
//!          stays uninitialized, nothing persisted, no listeners
//! ```
//!
//! # Persistence
//!
//! After every operation that reports [`Mutation::Changed`] the snapshot is
//! written under the configured key, unless the desk is in the mobile class.
//! Write failures are logged and otherwise ignored; the in-memory layout
//! stays authoritative.

use folio_core::Size;
use folio_core::event::{Event, KeyEvent};
use folio_core::geometry::Point;
use folio_layout::{Desk, LayoutEngine, Mutation, PanelError, PanelKey};
use folio_widgets::command_palette::{
    CommandAction, CommandPalette, PaletteOutcome, ThemeMode, is_toggle_shortcut,
};

use crate::cancellation::{Cancelled, CancellationToken};
use crate::config::FolioConfig;
use crate::state_persistence::{LayoutStore, StorageBackend};
use crate::subscription::{HostSubscriptions, Listener, SubscriptionCommand};
use crate::visit::{VisitBadge, VisitCounter, VisitTracker};

/// Receives theme changes from appearance commands.
pub trait ThemeSink {
    fn set_theme(&mut self, mode: ThemeMode);
}

/// Opens external links from social and system commands.
pub trait LinkOpener {
    fn open(&mut self, url: &str);
}

/// Listeners the desk keeps while mounted.
const DESK_LISTENERS: [Listener; 4] = [
    Listener::Resize,
    Listener::KeyDown,
    Listener::Blur,
    Listener::Visibility,
];

/// Owner of all desk state for one page.
pub struct DeskApp {
    config: FolioConfig,
    engine: LayoutEngine,
    store: LayoutStore,
    storage: Box<dyn StorageBackend>,
    desk: Option<Desk>,
    palette: CommandPalette,
    subscriptions: HostSubscriptions,
    theme: ThemeMode,
    visits: VisitTracker,
}

impl std::fmt::Debug for DeskApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeskApp")
            .field("storage", &self.storage.name())
            .field("desk", &self.desk)
            .field("palette_open", &self.palette.is_open())
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}

impl DeskApp {
    pub fn new(config: FolioConfig, storage: Box<dyn StorageBackend>) -> Self {
        let engine = config.layout_engine();
        let store = LayoutStore::new(config.layout.storage_key.clone());
        let palette = config.command_palette();
        Self {
            config,
            engine,
            store,
            storage,
            desk: None,
            palette,
            subscriptions: HostSubscriptions::new(),
            theme: ThemeMode::default(),
            visits: VisitTracker::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    /// The desk, once initialized.
    #[must_use]
    pub fn desk(&self) -> Option<&Desk> {
        self.desk.as_ref()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.desk.is_some()
    }

    #[must_use]
    pub fn palette(&self) -> &CommandPalette {
        &self.palette
    }

    /// Mutable palette for pointer events (hover, mouse movement).
    pub fn palette_mut(&mut self) -> &mut CommandPalette {
        &mut self.palette
    }

    #[must_use]
    pub const fn theme(&self) -> ThemeMode {
        self.theme
    }

    #[must_use]
    pub fn subscriptions(&self) -> &HostSubscriptions {
        &self.subscriptions
    }

    /// Storage backend, for hosts that keep other markers beside the layout.
    pub fn storage_mut(&mut self) -> &mut dyn StorageBackend {
        self.storage.as_mut()
    }

    /// Build the desk for `viewport`, restoring the stored layout when the
    /// viewport is not mobile.
    ///
    /// `token` is checked before each state-setting step; on cancellation
    /// nothing is committed and no listener is started.
    pub fn initialize(
        &mut self,
        viewport: Size,
        token: &CancellationToken,
    ) -> Result<Vec<SubscriptionCommand>, Cancelled> {
        token.check()?;
        let viewport = viewport.sanitized();
        let class = self.engine.classify(viewport);
        let defaults = self.engine.default_snapshot(class, viewport);

        token.check()?;
        let desk = if class.is_mobile() {
            Desk::new(self.engine.clone(), viewport)
        } else {
            match self.store.load(self.storage.as_ref(), &defaults) {
                Some(load) => {
                    tracing::debug!(
                        target: "folio.runtime",
                        from_version = load.from_version,
                        repairs = load.warnings.len(),
                        "restored stored layout"
                    );
                    Desk::restore(self.engine.clone(), viewport, &load.snapshot)
                }
                None => Desk::new(self.engine.clone(), viewport),
            }
        };

        token.check()?;
        tracing::info!(
            target: "folio.runtime",
            class = %desk.class(),
            width = viewport.width,
            height = viewport.height,
            "desk initialized"
        );
        self.desk = Some(desk);
        self.persist();
        Ok(self.subscriptions.reconcile(DESK_LISTENERS))
    }

    /// Fetch the visitor count and increment it once per day.
    pub fn sync_visits(
        &mut self,
        counter: &dyn VisitCounter,
        today: chrono::NaiveDate,
        token: &CancellationToken,
    ) -> Result<VisitBadge, Cancelled> {
        self.visits
            .sync(counter, self.storage.as_mut(), today, token)
    }

    #[must_use]
    pub const fn visit_badge(&self) -> VisitBadge {
        self.visits.badge()
    }

    pub fn open(&mut self, key: PanelKey) -> Mutation {
        self.mutate(|desk| desk.open(key))
    }

    pub fn close(&mut self, key: PanelKey) -> Mutation {
        self.mutate(|desk| desk.close(key))
    }

    pub fn toggle(&mut self, key: PanelKey) -> Mutation {
        self.mutate(|desk| desk.toggle(key))
    }

    pub fn minimize(&mut self, key: PanelKey) -> Mutation {
        self.mutate(|desk| desk.minimize(key))
    }

    pub fn pin(&mut self, key: PanelKey, pinned: bool) -> Mutation {
        self.mutate(|desk| desk.pin(key, pinned))
    }

    pub fn update_position(&mut self, key: PanelKey, position: Point) -> Mutation {
        self.mutate(|desk| desk.update_position(key, position))
    }

    pub fn bring_to_front(&mut self, key: PanelKey) -> Mutation {
        self.mutate(|desk| desk.bring_to_front(key))
    }

    /// Toggle by string id, as typed in the palette or sent by the host.
    pub fn toggle_by_id(&mut self, id: &str) -> Result<Mutation, PanelError> {
        let key = id.parse::<PanelKey>().inspect_err(|err| {
            tracing::error!(target: "folio.runtime", error = %err, "toggle on unknown panel");
        })?;
        Ok(self.toggle(key))
    }

    /// Regenerate defaults and forget the stored layout.
    ///
    /// The cleared key stays absent until the next mutation writes it.
    pub fn reset_layout(&mut self) -> Mutation {
        let Some(desk) = self.desk.as_mut() else {
            return Mutation::Unchanged;
        };
        let mutation = desk.reset_all();
        if let Err(e) = self.store.clear(self.storage.as_mut()) {
            tracing::warn!(target: "folio.storage", error = %e, "could not clear stored layout");
        }
        mutation
    }

    /// Adapt to a new canvas size.
    ///
    /// Leaving the mobile class brings back the stored desktop layout when
    /// one exists; mobile layouts are never saved, so it is still the last
    /// arrangement the user made.
    pub fn resize(&mut self, viewport: Size) -> Mutation {
        let viewport = viewport.sanitized();
        let next = self.engine.classify(viewport);
        let leaving_mobile = self
            .desk
            .as_ref()
            .is_some_and(|desk| desk.class().is_mobile() && !next.is_mobile());
        if leaving_mobile {
            let defaults = self.engine.default_snapshot(next, viewport);
            if let Some(load) = self.store.load(self.storage.as_ref(), &defaults) {
                tracing::debug!(target: "folio.runtime", class = %next, "stored layout restored on resize");
                self.desk = Some(Desk::restore(self.engine.clone(), viewport, &load.snapshot));
                return Mutation::Changed;
            }
        }
        self.mutate(|desk| desk.resize(viewport))
    }

    /// Route a host event.
    pub fn handle_event<H>(&mut self, event: &Event, host: &mut H) -> PaletteOutcome
    where
        H: ThemeSink + LinkOpener,
    {
        match event {
            Event::Key(key) => self.handle_key(key, host),
            Event::Resize { width, height } => {
                let _ = self.resize(Size::new(*width, *height));
                PaletteOutcome::Consumed
            }
            Event::Focus(_) => PaletteOutcome::Ignored,
        }
    }

    /// Global shortcut first, then the palette.
    pub fn handle_key<H>(&mut self, key: &KeyEvent, host: &mut H) -> PaletteOutcome
    where
        H: ThemeSink + LinkOpener,
    {
        if is_toggle_shortcut(key) {
            self.palette.toggle();
            return PaletteOutcome::Consumed;
        }
        let outcome = self.palette.handle_key(key);
        if let PaletteOutcome::Selected(action) = &outcome {
            self.dispatch(action.clone(), host);
        }
        outcome
    }

    /// Click on the palette row at `index`.
    pub fn click_command<H>(&mut self, index: usize, host: &mut H) -> PaletteOutcome
    where
        H: ThemeSink + LinkOpener,
    {
        let outcome = self.palette.click(index);
        if let PaletteOutcome::Selected(action) = &outcome {
            self.dispatch(action.clone(), host);
        }
        outcome
    }

    /// Carry out a selected command.
    pub fn dispatch<H>(&mut self, action: CommandAction, host: &mut H)
    where
        H: ThemeSink + LinkOpener,
    {
        tracing::debug!(target: "folio.runtime", ?action, "dispatch");
        match action {
            CommandAction::TogglePanel(key) => {
                let _ = self.toggle(key);
            }
            CommandAction::SetTheme(mode) => {
                self.theme = mode;
                host.set_theme(mode);
            }
            CommandAction::ResetLayout => {
                let _ = self.reset_layout();
            }
            CommandAction::OpenUrl(url) => host.open(&url),
            CommandAction::ClosePalette => self.palette.close(),
        }
    }

    /// Start a listener on the host's behalf (drag tracking).
    pub fn start_listener(&mut self, listener: Listener) -> Option<SubscriptionCommand> {
        self.subscriptions.start(listener)
    }

    /// Stop a listener started with [`Self::start_listener`].
    pub fn stop_listener(&mut self, listener: Listener) -> Option<SubscriptionCommand> {
        self.subscriptions.stop(listener)
    }

    /// Stop every listener. Safe to call more than once.
    pub fn teardown(&mut self) -> Vec<SubscriptionCommand> {
        let stopped = self.subscriptions.stop_all();
        tracing::debug!(target: "folio.runtime", stopped = stopped.len(), "teardown");
        stopped
    }

    fn mutate(&mut self, op: impl FnOnce(&mut Desk) -> Mutation) -> Mutation {
        let Some(desk) = self.desk.as_mut() else {
            tracing::debug!(target: "folio.runtime", "operation before initialize ignored");
            return Mutation::Unchanged;
        };
        let mutation = op(desk);
        if mutation.is_changed() {
            self.persist();
        }
        mutation
    }

    fn persist(&mut self) {
        let Some(desk) = self.desk.as_ref() else {
            return;
        };
        if !desk.is_persistable() {
            return;
        }
        if let Err(e) = self.store.save(self.storage.as_mut(), desk.snapshot()) {
            tracing::warn!(target: "folio.storage", error = %e, "layout not saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_persistence::MemoryStorage;
    use folio_core::event::{KeyCode, Modifiers};
    use folio_layout::STORAGE_KEY;

    #[derive(Default)]
    struct Host {
        themes: Vec<ThemeMode>,
        urls: Vec<String>,
    }

    impl ThemeSink for Host {
        fn set_theme(&mut self, mode: ThemeMode) {
            self.themes.push(mode);
        }
    }

    impl LinkOpener for Host {
        fn open(&mut self, url: &str) {
            self.urls.push(url.to_owned());
        }
    }

    fn desktop() -> Size {
        Size::new(1440.0, 900.0)
    }

    fn app(storage: &MemoryStorage) -> DeskApp {
        DeskApp::new(FolioConfig::default(), Box::new(storage.clone()))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code)
    }

    fn type_query(app: &mut DeskApp, host: &mut Host, text: &str) {
        for c in text.chars() {
            let _ = app.handle_key(&key(KeyCode::Char(c)), host);
        }
    }

    #[test]
    fn operations_before_initialize_are_ignored() {
        let storage = MemoryStorage::new();
        let mut app = app(&storage);
        assert_eq!(app.toggle(PanelKey::About), Mutation::Unchanged);
        assert!(storage.is_empty());
    }

    #[test]
    fn initialize_starts_desk_listeners() {
        let storage = MemoryStorage::new();
        let mut app = app(&storage);
        let cmds = app.initialize(desktop(), &CancellationToken::never()).unwrap();
        assert_eq!(cmds.len(), DESK_LISTENERS.len());
        assert!(app.is_initialized());
        assert_eq!(app.teardown().len(), DESK_LISTENERS.len());
        assert!(app.teardown().is_empty());
    }

    #[test]
    fn mutations_are_persisted_on_desktop() {
        let storage = MemoryStorage::new();
        let mut app = app(&storage);
        let _ = app.initialize(desktop(), &CancellationToken::never()).unwrap();
        let _ = app.toggle(PanelKey::Projects);
        let raw = storage.load(STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"schemaVersion\":2"));
        let _ = app.teardown();
    }

    #[test]
    fn mobile_is_never_persisted() {
        let storage = MemoryStorage::new();
        let mut app = app(&storage);
        let _ = app
            .initialize(Size::new(375.0, 667.0), &CancellationToken::never())
            .unwrap();
        let _ = app.toggle(PanelKey::Projects);
        assert!(storage.is_empty());
        assert!(PanelKey::ALL.iter().all(|k| {
            let desk = app.desk().unwrap();
            *k == PanelKey::Projects || desk.state(*k).active
        }));
        let _ = app.teardown();
    }

    #[test]
    fn shortcut_toggles_palette() {
        let storage = MemoryStorage::new();
        let mut app = app(&storage);
        let mut host = Host::default();
        let ctrl_k = key(KeyCode::Char('k')).with_modifiers(Modifiers::CTRL);
        assert_eq!(app.handle_key(&ctrl_k, &mut host), PaletteOutcome::Consumed);
        assert!(app.palette().is_open());
        assert_eq!(
            app.handle_key(&key(KeyCode::Char('/')), &mut host),
            PaletteOutcome::Consumed
        );
        assert!(!app.palette().is_open());
    }

    #[test]
    fn palette_selection_toggles_panel() {
        let storage = MemoryStorage::new();
        let mut app = app(&storage);
        let mut host = Host::default();
        let _ = app.initialize(desktop(), &CancellationToken::never()).unwrap();
        app.palette_mut().open();
        type_query(&mut app, &mut host, "about");
        let outcome = app.handle_key(&key(KeyCode::Enter), &mut host);
        assert_eq!(
            outcome,
            PaletteOutcome::Selected(CommandAction::TogglePanel(PanelKey::About))
        );
        assert!(app.desk().unwrap().state(PanelKey::About).active);
        assert!(!app.palette().is_open());
        let _ = app.teardown();
    }

    #[test]
    fn theme_and_links_reach_the_host() {
        let storage = MemoryStorage::new();
        let mut app = app(&storage);
        let mut host = Host::default();
        app.dispatch(CommandAction::SetTheme(ThemeMode::Light), &mut host);
        app.dispatch(CommandAction::OpenUrl("https://example.com".into()), &mut host);
        assert_eq!(host.themes, vec![ThemeMode::Light]);
        assert_eq!(host.urls, vec!["https://example.com".to_owned()]);
        assert_eq!(app.theme(), ThemeMode::Light);
    }

    #[test]
    fn reset_clears_storage_and_z_counter() {
        let storage = MemoryStorage::new();
        let mut app = app(&storage);
        let mut host = Host::default();
        let _ = app.initialize(desktop(), &CancellationToken::never()).unwrap();
        let _ = app.toggle(PanelKey::About);
        let _ = app.toggle(PanelKey::Stack);
        app.dispatch(CommandAction::ResetLayout, &mut host);
        assert!(storage.load(STORAGE_KEY).unwrap().is_none());
        assert_eq!(app.desk().unwrap().highest_z_index(), 1);
        let _ = app.teardown();
    }

    #[test]
    fn unknown_id_is_an_error() {
        let storage = MemoryStorage::new();
        let mut app = app(&storage);
        let _ = app.initialize(desktop(), &CancellationToken::never()).unwrap();
        assert!(matches!(
            app.toggle_by_id("resume"),
            Err(PanelError::UnknownPanelKey { .. })
        ));
        assert_eq!(app.toggle_by_id("about"), Ok(Mutation::Changed));
        let _ = app.teardown();
    }

    #[test]
    fn resize_event_reclamps() {
        let storage = MemoryStorage::new();
        let mut app = app(&storage);
        let mut host = Host::default();
        let _ = app.initialize(desktop(), &CancellationToken::never()).unwrap();
        let _ = app.update_position(PanelKey::About, Point::new(990.0, 600.0));
        let _ = app.handle_event(
            &Event::Resize {
                width: 1200.0,
                height: 800.0,
            },
            &mut host,
        );
        assert_eq!(
            app.desk().unwrap().state(PanelKey::About).position,
            Point::new(750.0, 500.0)
        );
        let _ = app.teardown();
    }
}
