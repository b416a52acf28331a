//! Status bar — play control, player state, last event and keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app_state::{AppState, PlayerStatus};
use crate::theme::{
    C_ACCENT, C_BADGE_ERR, C_BADGE_LIVE, C_MODE_FILTER, C_MODE_NORMAL, C_MODE_NOTICE, C_MUTED,
    C_PLAYING, C_SECONDARY, C_SELECTION_BG,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    /// A modal notice is waiting to be acknowledged.
    Notice,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Filter => "FILTER",
            Self::Notice => "NOTICE",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Filter => C_MODE_FILTER,
            Self::Notice => C_MODE_NOTICE,
        }
    }
}

/// The play "button": bright when playable, dimmed otherwise.
pub fn play_button(enabled: bool) -> Span<'static> {
    if enabled {
        Span::styled(
            " ▶ PLAY ",
            Style::default()
                .fg(C_PLAYING)
                .bg(C_SELECTION_BG)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(" ▷ PLAY ", Style::default().fg(C_MUTED))
    }
}

fn player_badge(status: &PlayerStatus) -> Span<'_> {
    match status {
        PlayerStatus::Ready(path) => Span::styled(
            format!(
                "● {}",
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string())
            ),
            Style::default().fg(C_BADGE_LIVE),
        ),
        PlayerStatus::Override(cmd) => {
            Span::styled(format!("● {} (override)", cmd), Style::default().fg(C_BADGE_LIVE))
        }
        PlayerStatus::Unavailable(_) => Span::styled(
            "○ NO PLAYER",
            Style::default().fg(C_BADGE_ERR).add_modifier(Modifier::BOLD),
        ),
    }
}

/// One row: play button, player badge, last app event.
pub fn draw_play_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![
        play_button(state.play_enabled()),
        Span::raw(" "),
        player_badge(&state.player),
    ];
    if let Some(event) = state.last_event() {
        spans.push(Span::styled("  │ ", Style::default().fg(C_MUTED)));
        spans.push(Span::styled(event, Style::default().fg(C_SECONDARY)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode) {
    let keys = match mode {
        InputMode::Normal => {
            " ↑↓/jk select  ←→/Tab category  Enter play  / filter  y copy url  K keys  ? help  q quit"
        }
        InputMode::Filter => " type to filter  ↑↓ move  Enter keep  Esc clear+close",
        InputMode::Notice => " Enter/Esc dismiss",
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(keys, Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// One-row header: app name and channel count.
pub fn draw_title_bar(frame: &mut Frame, area: Rect, channels: usize) {
    let line = Line::from(vec![
        Span::styled(
            " vertele ",
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("· {} channels", channels),
            Style::default().fg(C_SECONDARY),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
