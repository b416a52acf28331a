//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns all components, the playback service and `AppState`.
//! - A bounded `tokio::mpsc` channel carries terminal events from the input
//!   thread. Play requests from the browser's callback travel on their own
//!   unbounded channel so a burst of input can never push them out.
//! - The event loop draws each frame, then awaits the next message or tick.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use vertele_core::categories::CategoryTable;
use vertele_core::channel::SelectedChannel;
use vertele_core::error::{PlayError, StoreError};
use vertele_core::player::Detection;
use vertele_core::service::PlaybackService;

use crate::{
    action::Action,
    app_state::{AppState, PlayerStatus},
    browser::{ChannelBrowser, PlayRequest},
    component::Component,
    components::{channel_list::ChannelList, help_overlay::HelpOverlay, notice::NoticeStack},
    widgets::{
        status_bar::{self, InputMode},
        toast::ToastManager,
    },
};

/// Presentation-only tick: expires toasts.
const UI_TICK: Duration = Duration::from_millis(100);

// ── Internal event bus ────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum AppMessage {
    Event(Event),
    /// Sent by the browser's play callback.
    PlayRequested(SelectedChannel),
}

pub struct App {
    state: AppState,
    service: PlaybackService,
    /// `--player`: launch with this command instead of the detected player.
    player_override: Option<String>,
    channel_list: ChannelList,
    notices: NoticeStack,
    help_overlay: HelpOverlay,
    toast: ToastManager,
    should_quit: bool,
}

impl App {
    /// Build the UI from the store contents. Detection must already have run.
    pub fn new(
        service: PlaybackService,
        categories: CategoryTable,
        player_override: Option<String>,
    ) -> Result<Self, StoreError> {
        let mut browser = ChannelBrowser::new(categories);
        let channels = service.store().list_all()?;
        let count = channels.len();
        for channel in channels {
            browser.add_channel_entry(channel);
        }
        browser.select_default();

        let player = player_status(&service, player_override.as_deref());
        let mut state = AppState::new(player);
        state.can_play = browser.can_play();
        state.push_event(format!("loaded {} channels", count));

        let mut notices = NoticeStack::new();
        if let PlayerStatus::Unavailable(reason) = &state.player {
            warn!("starting in degraded mode: {}", reason);
            notices.warning("No media player found", reason.clone());
        }
        if count == 0 {
            notices.warning("No channels", "The channel store is empty.");
        }

        let mut app = Self {
            state,
            service,
            player_override,
            channel_list: ChannelList::new(browser),
            notices,
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(),
            should_quit: false,
        };
        app.sync_input_mode();
        Ok(app)
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        self.service.shutdown();
        info!("vertele exiting");

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let (event_tx, mut rx) = mpsc::channel::<AppMessage>(256);
        let mut play_rx = self.register_play_handler();

        // ── Input thread: keyboard/mouse events ──────────────────────────────
        // A plain thread rather than a runtime blocking task, so a pending
        // read never holds up runtime shutdown.
        std::thread::spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("terminal event read failed: {}", e);
                    break;
                }
            }
        });

        let mut ui_tick = tokio::time::interval(UI_TICK);
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }

            if self.should_quit {
                break;
            }

            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(msg) => {
                        self.handle_message(msg);
                        needs_redraw = true;
                    }
                    None => break,
                },
                Some(selected) = play_rx.recv() => {
                    self.handle_message(AppMessage::PlayRequested(selected));
                    needs_redraw = true;
                }
                _ = ui_tick.tick() => {
                    needs_redraw = self.toast.tick();
                }
            }
        }
        Ok(())
    }

    /// Route the browser's play callback into the event loop.
    fn register_play_handler(&mut self) -> mpsc::UnboundedReceiver<SelectedChannel> {
        let (play_tx, play_rx) = mpsc::unbounded_channel::<SelectedChannel>();
        self.channel_list.browser.on_play(move |selected| {
            // Only fails once the loop, and with it the receiver, is gone.
            if play_tx.send(selected.clone()).is_err() {
                warn!("play request for '{}' after shutdown", selected.title);
            }
        });
        play_rx
    }

    pub fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return;
                    }
                    for a in self.handle_key(key) {
                        self.dispatch(a);
                    }
                }
                Event::Mouse(mouse) => {
                    for a in self.handle_mouse(mouse) {
                        self.dispatch(a);
                    }
                }
                Event::Resize(w, h) => debug!("terminal resized to {}x{}", w, h),
                _ => {}
            },
            AppMessage::PlayRequested(selected) => self.play(selected),
        }
        self.state.can_play = self.channel_list.browser.can_play();
        self.sync_input_mode();
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // Modal notice captures all keys while it is up.
        if self.notices.is_visible() {
            return self.notices.handle_key(key, &self.state);
        }

        if self.help_overlay.visible {
            let actions = self.help_overlay.handle_key(key, &self.state);
            if !actions.is_empty() {
                return actions;
            }
            // Any other key closes the overlay
            return vec![Action::ToggleHelp];
        }

        if self.state.input_mode == InputMode::Normal {
            match key.code {
                KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE => {
                    return vec![Action::Quit]
                }
                KeyCode::Char('?') => return vec![Action::ToggleHelp],
                KeyCode::Char('K') => return vec![Action::ToggleKeys],
                _ => {}
            }
        }

        self.channel_list.handle_key(key, &self.state)
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        if self.notices.is_visible() || self.help_overlay.visible {
            return vec![];
        }
        self.channel_list
            .handle_mouse(event, ratatui::layout::Rect::default(), &self.state)
    }

    fn dispatch(&mut self, action: Action) {
        // Broadcast to components first, then handle at the app level.
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.channel_list.on_action(&action, s));
            out.extend(self.notices.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action);

        // Depth-limited to 1 level
        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            Action::PlaySelected => match self.channel_list.browser.play() {
                PlayRequest::Dispatched => {}
                PlayRequest::NoSelection => {
                    self.notices.warning(
                        "No channel selected",
                        "Pick a channel from the list before pressing play.",
                    );
                }
                PlayRequest::NoHandler => {
                    error!("play activated before the play handler was registered");
                }
            },

            Action::OpenFilter => self.state.input_mode = InputMode::Filter,
            Action::CloseFilter => self.state.input_mode = InputMode::Normal,

            Action::ToggleHelp => {}
            Action::ToggleKeys => self.state.show_keys_bar = !self.state.show_keys_bar,
            Action::DismissNotice => {}

            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        let display = crate::components::channel_list::truncate(&text, 40);
                        self.toast.success(format!("copied: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }

            Action::Quit => self.should_quit = true,
        }
    }

    /// Handle a play request coming back from the browser callback.
    fn play(&mut self, selected: SelectedChannel) {
        info!("play requested: '{}' ({})", selected.title, selected.instance);
        match self.player_override.clone() {
            Some(cmd) => match self.service.play_with(&cmd, &selected.instance) {
                Ok(true) => self.on_launched(&selected, &cmd),
                Ok(false) => self.notices.error(
                    "Playback failed",
                    format!("Could not start '{}'. See the log for details.", cmd),
                ),
                Err(e) => self.report_play_error(&selected, e),
            },
            None => match self.service.play(&selected) {
                Ok(report) => {
                    let player = report.player.display().to_string();
                    self.on_launched(&selected, &player);
                }
                Err(e) => self.report_play_error(&selected, e),
            },
        }
    }

    fn on_launched(&mut self, selected: &SelectedChannel, player: &str) {
        self.toast.success(format!("▶ {}", selected.title));
        self.state
            .push_event(format!("launched {} with {}", selected.title, player));
        self.state.launches += 1;
        self.state.last_launched = Some(selected.instance.clone());
    }

    fn report_play_error(&mut self, selected: &SelectedChannel, err: PlayError) {
        warn!("play '{}' failed: {}", selected.title, err);
        self.state
            .push_event(format!("could not play {}", selected.title));
        let (message, detail) = play_error_notice(selected, &err);
        self.notices.error(message, detail);
    }

    fn sync_input_mode(&mut self) {
        self.state.input_mode = if self.notices.is_visible() {
            InputMode::Notice
        } else if self.channel_list.is_filter_active() {
            InputMode::Filter
        } else {
            InputMode::Normal
        };
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use crate::theme::C_BG;
        use ratatui::widgets::Block;
        let area = frame.area();

        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        let keys_h = if self.state.show_keys_bar { 1u16 } else { 0 };
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(keys_h),
            ])
            .split(area);

        status_bar::draw_title_bar(frame, outer[0], self.channel_list.browser.total_channels());

        let overlay_up = self.notices.is_visible() || self.help_overlay.visible;
        self.channel_list
            .draw(frame, outer[1], !overlay_up, &self.state);

        status_bar::draw_play_bar(frame, outer[2], &self.state);
        if self.state.show_keys_bar {
            status_bar::draw_keys_bar(frame, outer[3], self.state.input_mode);
        }

        // ── Overlays (help below notices, toasts on top) ─────────────────────
        self.help_overlay.draw(frame, area, false, &self.state);
        self.notices.draw(frame, area, true, &self.state);
        self.toast.draw(frame, area);
    }
}

fn player_status(service: &PlaybackService, player_override: Option<&str>) -> PlayerStatus {
    if let Some(cmd) = player_override {
        return PlayerStatus::Override(cmd.to_string());
    }
    match service.launcher().detection() {
        Some(Detection::Detected(path)) => PlayerStatus::Ready(path.clone()),
        Some(Detection::Unavailable(reason)) => PlayerStatus::Unavailable(reason.clone()),
        None => PlayerStatus::Unavailable("player detection has not run".to_string()),
    }
}

/// Primary message and detail line for a failed play.
pub fn play_error_notice(selected: &SelectedChannel, err: &PlayError) -> (String, String) {
    match err {
        PlayError::PlayerUnavailable(reason) => (
            "Cannot play".to_string(),
            format!("No media player is installed. {}", reason),
        ),
        PlayError::ChannelNotFound(instance) => (
            "Channel not found".to_string(),
            format!(
                "'{}' ({}) is no longer in the channel store.",
                selected.title, instance
            ),
        ),
        PlayError::LaunchFailure(source) => (
            format!("Could not play {}", selected.title),
            source.to_string(),
        ),
        PlayError::Store(source) => ("Channel store error".to_string(), source.to_string()),
    }
}
