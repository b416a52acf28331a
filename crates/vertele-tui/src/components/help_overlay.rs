//! HelpOverlay component — centered popup with keyboard shortcut reference.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::Action,
    app_state::{AppState, PlayerStatus},
    component::Component,
    theme::{style_heading, C_BADGE_ERR, C_MUTED, C_PANEL_BORDER, C_POPUP_BG, C_PRIMARY, C_SECONDARY},
    widgets::popup::centered_rect,
};

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

impl Component for HelpOverlay {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        match key.code {
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => vec![Action::ToggleHelp],
            // Consume all keys while overlay is open
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ToggleHelp = action {
            self.toggle();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if !self.visible {
            return;
        }

        let popup = centered_rect(64, 24, area);

        let mut help_lines: Vec<Line> = vec![
            Line::from(Span::styled(" keyboard shortcuts", style_heading())),
            Line::from(""),
            section(" channels"),
            help_row("↑ / ↓  or  k / j", "move selection (Shift = 5 rows)"),
            help_row("pg up / pg dn", "jump 10 rows"),
            help_row("home / end  or  g / G", "first / last channel"),
            help_row("enter / space", "play selected channel"),
            help_row("y", "copy stream url"),
            Line::from(""),
            section(" categories"),
            help_row("← / →  or  h / l", "previous / next category"),
            help_row("tab / shift-tab", "next / previous category"),
            help_row("1 … 9", "jump to category"),
            help_row("/", "filter titles (Esc clears + closes)"),
            Line::from(""),
            section(" app"),
            help_row("K", "toggle keys bar"),
            help_row("?", "toggle this help overlay"),
            help_row("q / Ctrl+C", "quit"),
            Line::from(""),
        ];
        let player_line = match &state.player {
            PlayerStatus::Ready(path) => Line::from(Span::styled(
                format!(" player: {}", path.display()),
                Style::default().fg(C_SECONDARY),
            )),
            PlayerStatus::Override(cmd) => Line::from(Span::styled(
                format!(" player: {} (--player)", cmd),
                Style::default().fg(C_SECONDARY),
            )),
            PlayerStatus::Unavailable(reason) => Line::from(Span::styled(
                format!(" player: {}", reason),
                Style::default().fg(C_BADGE_ERR),
            )),
        };
        help_lines.push(player_line);
        help_lines.push(Line::from(Span::styled(
            " press ? or esc to close",
            Style::default().fg(C_MUTED),
        )));

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(help_lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(C_PANEL_BORDER))
                        .style(Style::default().bg(C_POPUP_BG)),
                )
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
    ))
}

fn help_row<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{:<22}", key),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc, Style::default().fg(C_SECONDARY)),
    ])
}
