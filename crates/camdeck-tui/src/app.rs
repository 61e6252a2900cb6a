//! Application core — event loop, key handling, action dispatch.
//!
//! The action loop is the single mutator of dashboard state. Fetches
//! run as spawned tasks holding a cloned [`RegistryClient`]; they
//! resolve by sending completion actions back through the channel, and
//! the selection token check happens here, at apply time.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use camdeck_api::RegistryClient;
use camdeck_core::{CoreError, DashboardSession, ListOutcome, SelectOutcome};

use crate::action::{Action, Focus, Notification};
use crate::event::{Event, EventReader};
use crate::form_view::{FIELDS, FieldKind, FormView};
use crate::pane::TuiCardPane;
use crate::tui::Tui;
use crate::ui;

/// Ticks are 250ms; a note stays up for ~5 seconds.
const STATUS_TTL_TICKS: u32 = 20;
const TICKS_PER_SECOND: u64 = 4;

pub struct App {
    session: DashboardSession<TuiCardPane>,
    pane: TuiCardPane,
    form: FormView,
    focus: Focus,
    running: bool,

    refresh_in_flight: bool,
    /// Auto-refresh countdown, in ticks.
    refresh_ticks: u64,
    ticks_until_refresh: u64,

    status: Option<Notification>,
    status_ttl: u32,
    /// Set when the first list fetch fails; cleared by a successful one.
    fatal: Option<String>,
    /// Cache-bust token for preview URLs, bumped on every applied fetch.
    bust: u64,

    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(client: RegistryClient, refresh_interval: Duration) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let refresh_ticks = refresh_interval.as_secs().max(1) * TICKS_PER_SECOND;

        Self {
            session: DashboardSession::new(client),
            pane: TuiCardPane::new(),
            form: FormView::default(),
            focus: Focus::default(),
            running: true,
            refresh_in_flight: false,
            refresh_ticks,
            ticks_until_refresh: refresh_ticks,
            status: None,
            status_ttl: 0,
            fatal: None,
            bust: 0,
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("dashboard event loop started");
        self.action_tx.send(Action::Refresh)?;

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key(key) {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            // Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                let render = matches!(action, Action::Render);
                self.process_action(action);
                if render {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("dashboard event loop ended");
        Ok(())
    }

    // ── Key handling ────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        // Ctrl-C always quits, whatever has focus.
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        match key.code {
            KeyCode::Tab => return Some(Action::FocusNext),
            KeyCode::BackTab => return Some(Action::FocusPrev),
            _ => {}
        }

        match self.focus {
            Focus::List => match key.code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('r') => Some(Action::Refresh),
                KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorUp),
                KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorDown),
                KeyCode::Enter => Some(Action::SelectUnderCursor),
                _ => None,
            },
            Focus::Gallery => match key.code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('r') => Some(Action::Refresh),
                KeyCode::Left | KeyCode::Char('h') => Some(Action::GalleryPrevPage),
                KeyCode::Right | KeyCode::Char('l') => Some(Action::GalleryNextPage),
                KeyCode::Char(c @ '1'..='4') => {
                    Some(Action::GalleryPickMain((c as usize) - ('1' as usize)))
                }
                KeyCode::Char('o') => Some(Action::OpenOriginal),
                _ => None,
            },
            Focus::Form => match (key.modifiers, key.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('s')) => Some(Action::SubmitConfig),
                (_, KeyCode::Esc) => {
                    self.focus = Focus::List;
                    None
                }
                (_, KeyCode::Up) => Some(Action::FormUp),
                (_, KeyCode::Down) => Some(Action::FormDown),
                (_, KeyCode::Enter) => Some(Action::FormToggle),
                // Space toggles flags; in a text field it types a space.
                (_, KeyCode::Char(' ')) if self.form_on_flag() => Some(Action::FormToggle),
                _ => {
                    self.form.handle_key(key);
                    None
                }
            },
        }
    }

    fn form_on_flag(&self) -> bool {
        matches!(FIELDS[self.form.cursor()].kind, FieldKind::Flag(_))
    }

    // ── Action processing ───────────────────────────────────────────

    fn process_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Render | Action::Resize(..) => {}
            Action::Tick => self.on_tick(),

            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusPrev => self.focus = self.focus.prev(),

            Action::Refresh => self.start_refresh(),
            Action::DevicesFetched(result) => self.on_devices_fetched(result),

            Action::CursorUp => self.pane.cursor_up(),
            Action::CursorDown => self.pane.cursor_down(),
            Action::SelectUnderCursor => {
                if let Some(id) = self.pane.device_under_cursor().map(str::to_owned) {
                    self.start_select(&id);
                }
            }
            Action::DeviceFetched(token, result) => {
                match self.session.complete_select(token, result.map(|r| *r)) {
                    SelectOutcome::Applied(form) => {
                        self.bust = self.bust.wrapping_add(1);
                        self.form.replace(*form);
                    }
                    SelectOutcome::Stale => debug!("dropped stale detail response"),
                    SelectOutcome::Failed(err) => self.note(Notification::error(err.to_string())),
                }
            }

            Action::GalleryNextPage => {
                self.session.gallery_mut().next_page();
            }
            Action::GalleryPrevPage => {
                self.session.gallery_mut().prev_page();
            }
            Action::GalleryPickMain(n) => {
                if let Some(url) = self.session.gallery().window().get(n).cloned() {
                    self.session.gallery_mut().select_main(&url);
                }
            }
            Action::OpenOriginal => self.open_original(),

            Action::FormUp => self.form.up(),
            Action::FormDown => self.form.down(),
            Action::FormToggle => self.form.toggle(),
            Action::SubmitConfig => self.start_submit(),
            Action::ConfigSaved(result) => self.on_config_saved(result),
        }
    }

    fn on_tick(&mut self) {
        if self.status_ttl > 0 {
            self.status_ttl -= 1;
            if self.status_ttl == 0 {
                self.status = None;
            }
        }
        if self.ticks_until_refresh > 0 {
            self.ticks_until_refresh -= 1;
        }
        if self.ticks_until_refresh == 0 && !self.refresh_in_flight {
            let _ = self.action_tx.send(Action::Refresh);
        }
    }

    // ── Fetch tasks ─────────────────────────────────────────────────

    /// At most one list fetch is in flight at a time.
    fn start_refresh(&mut self) {
        if self.refresh_in_flight {
            return;
        }
        self.refresh_in_flight = true;
        self.ticks_until_refresh = self.refresh_ticks;

        let client = self.session.client().clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = client.list_devices().await.map_err(CoreError::from);
            let _ = tx.send(Action::DevicesFetched(result));
        });
    }

    fn on_devices_fetched(&mut self, result: Result<Vec<camdeck_core::DeviceRecord>, CoreError>) {
        self.refresh_in_flight = false;
        let devices = match result {
            Ok(devices) => devices,
            Err(err) => {
                if self.session.has_loaded_once() {
                    // Keep the rendered content; just surface a note.
                    self.note(Notification::error(format!("Refresh failed: {err}")));
                } else {
                    self.fatal = Some(err.to_string());
                }
                return;
            }
        };

        self.fatal = None;
        self.bust = self.bust.wrapping_add(1);
        let now = chrono::Utc::now().timestamp();

        match self.session.apply_device_list(&mut self.pane, &devices, now) {
            ListOutcome::Empty => self.note(Notification::info("No devices registered")),
            ListOutcome::Refreshed => {}
            ListOutcome::SelectionCleared => {
                self.note(Notification::info("Selected device is no longer registered"));
            }
            ListOutcome::AutoSelect(id) => {
                self.pane.cursor_to(&id);
                self.start_select(&id);
            }
        }
    }

    fn start_select(&mut self, device_id: &str) {
        let token = self.session.begin_select(device_id);
        let client = self.session.client().clone();
        let tx = self.action_tx.clone();
        let id = device_id.to_owned();
        tokio::spawn(async move {
            let result = client.get_device(&id).await.map(Box::new).map_err(|err| {
                if err.is_not_found() {
                    CoreError::DeviceNotFound { device_id: id }
                } else {
                    err.into()
                }
            });
            let _ = tx.send(Action::DeviceFetched(token, result));
        });
    }

    /// Open the main preview image in the system browser, at the stored
    /// URL without a cache-bust token, resolved against the registry base.
    fn open_original(&mut self) {
        let Some(url) = self.original_url() else {
            self.note(Notification::info("No capture to open"));
            return;
        };
        match open::that(&url) {
            Ok(()) => self.note(Notification::info(format!("Opened {url}"))),
            Err(err) => self.note(Notification::error(format!("Could not open image: {err}"))),
        }
    }

    fn original_url(&self) -> Option<String> {
        let main = self.session.gallery().main()?;
        match self.session.client().resolve_url(main) {
            Ok(url) => Some(url.into()),
            Err(err) => {
                warn!(error = %err, "unresolvable preview url");
                None
            }
        }
    }

    fn start_submit(&mut self) {
        let Some(id) = self.session.selected_id().map(str::to_owned) else {
            self.note(Notification::error("No device selected"));
            return;
        };
        let update = self.form.state().to_update();
        let client = self.session.client().clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = client
                .update_config(&id, &update)
                .await
                .map_err(CoreError::from);
            let _ = tx.send(Action::ConfigSaved(result));
        });
    }

    fn on_config_saved(&mut self, result: Result<(), CoreError>) {
        match result {
            Ok(()) => {
                self.note(Notification::success("Configuration saved"));
                // Re-fetch so every pane reflects the registry's view.
                let _ = self.action_tx.send(Action::Refresh);
            }
            Err(err) => {
                warn!(error = %err, "config save failed");
                self.note(Notification::error(format!("Save failed: {err}")));
            }
        }
    }

    fn note(&mut self, note: Notification) {
        self.status = Some(note);
        self.status_ttl = STATUS_TTL_TICKS;
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render(&mut self, frame: &mut Frame) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        ui::render_header(
            frame,
            header,
            self.session.device_count(),
            self.refresh_in_flight,
        );
        ui::render_footer(frame, footer, self.status.as_ref());

        if let Some(message) = &self.fatal {
            ui::render_fatal(frame, body, message);
            return;
        }
        // First fetch still in flight: no list to render yet.
        if !self.session.has_loaded_once() {
            ui::render_loading(frame, body);
            return;
        }

        let [list_area, detail_area] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(body);
        let [preview_area, analysis_area, form_area] = Layout::vertical([
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Min(6),
        ])
        .areas(detail_area);

        ui::render_device_list(frame, list_area, &self.pane, self.focus == Focus::List);
        ui::render_preview(
            frame,
            preview_area,
            self.session.gallery(),
            self.bust,
            self.focus == Focus::Gallery,
        );
        ui::render_analysis(frame, analysis_area, self.session.selected_record());
        ui::render_form(frame, form_area, &mut self.form, self.focus == Focus::Form);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::NotificationLevel;
    use pretty_assertions::assert_eq;

    fn app() -> App {
        let base = "http://reg.local:8000".parse().expect("base url");
        let client = RegistryClient::new(base, Duration::from_secs(5)).expect("client");
        App::new(client, Duration::from_secs(5))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn gallery_focus_binds_open_original() {
        let mut app = app();
        app.focus = Focus::Gallery;
        assert!(matches!(
            app.handle_key(key(KeyCode::Char('o'))),
            Some(Action::OpenOriginal)
        ));
        // List focus does not: 'o' means nothing there.
        app.focus = Focus::List;
        assert!(app.handle_key(key(KeyCode::Char('o'))).is_none());
    }

    #[test]
    fn open_original_without_a_capture_just_notes() {
        let mut app = app();
        app.process_action(Action::OpenOriginal);
        let note = app.status.as_ref().expect("status note");
        assert_eq!(note.level, NotificationLevel::Info);
        assert_eq!(note.message, "No capture to open");
    }

    #[test]
    fn original_url_resolves_against_the_registry() {
        let mut app = app();
        app.session
            .gallery_mut()
            .load(vec!["/uploads/cam-1/last.jpg?v=3".into()]);
        assert_eq!(
            app.original_url().as_deref(),
            Some("http://reg.local:8000/uploads/cam-1/last.jpg")
        );
    }
}
