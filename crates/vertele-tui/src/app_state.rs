//! AppState — shared read-only data passed to all components during render/event.
//!
//! The App event-loop is the only thing that writes to AppState.

use std::collections::VecDeque;
use std::path::PathBuf;

use crate::widgets::status_bar::InputMode;

const MAX_EVENTS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerStatus {
    Ready(PathBuf),
    /// `--player` override: detection is bypassed.
    Override(String),
    Unavailable(String),
}

impl PlayerStatus {
    pub fn can_launch(&self) -> bool {
        !matches!(self, PlayerStatus::Unavailable(_))
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub input_mode: InputMode,
    pub player: PlayerStatus,
    /// Whether the browser currently has a selection.
    pub can_play: bool,
    pub show_keys_bar: bool,
    /// Recent app events, newest last, as `HH:MM:SS message`.
    pub events: VecDeque<String>,
    pub launches: usize,
    /// Instance key of the most recently launched channel.
    pub last_launched: Option<String>,
}

impl AppState {
    pub fn new(player: PlayerStatus) -> Self {
        Self {
            input_mode: InputMode::Normal,
            player,
            can_play: false,
            show_keys_bar: true,
            events: VecDeque::new(),
            launches: 0,
            last_launched: None,
        }
    }

    pub fn push_event(&mut self, msg: impl Into<String>) {
        let stamp = chrono::Local::now().format("%H:%M:%S");
        self.events.push_back(format!("{} {}", stamp, msg.into()));
        while self.events.len() > MAX_EVENTS {
            self.events.pop_front();
        }
    }

    pub fn last_event(&self) -> Option<&str> {
        self.events.back().map(String::as_str)
    }

    /// Play control is live only with a selection and a usable player.
    pub fn play_enabled(&self) -> bool {
        self.can_play && self.player.can_launch()
    }
}
