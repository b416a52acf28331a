//! Modal notices — a primary message plus detail, acknowledged with Enter/Esc.
//!
//! Notices queue up; only the oldest is shown and it blocks other input.

use std::collections::VecDeque;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tracing::debug;

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_POPUP_BG, C_SECONDARY},
    widgets::{popup::centered_rect, toast::Severity},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
    pub detail: String,
}

#[derive(Default)]
pub struct NoticeStack {
    queue: VecDeque<Notice>,
}

impl NoticeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>, detail: impl Into<String>) {
        let notice = Notice {
            severity,
            message: message.into(),
            detail: detail.into(),
        };
        if self.queue.contains(&notice) {
            return;
        }
        debug!("notice: {:?} {}", notice.severity, notice.message);
        self.queue.push_back(notice);
    }

    pub fn warning(&mut self, message: impl Into<String>, detail: impl Into<String>) {
        self.push(Severity::Warning, message, detail);
    }

    pub fn error(&mut self, message: impl Into<String>, detail: impl Into<String>) {
        self.push(Severity::Error, message, detail);
    }

    pub fn is_visible(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn current(&self) -> Option<&Notice> {
        self.queue.front()
    }

    pub fn dismiss(&mut self) -> Option<Notice> {
        self.queue.pop_front()
    }
}

impl Component for NoticeStack {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.is_visible() {
            return vec![];
        }
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => vec![Action::DismissNotice],
            // Swallow everything else while the notice is up.
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::DismissNotice = action {
            self.dismiss();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, _state: &AppState) {
        let Some(notice) = self.current() else {
            return;
        };
        let color = notice.severity.color();
        let popup = centered_rect(56, 9, area);

        let mut lines = vec![
            Line::from(Span::styled(
                format!(" {} {}", notice.severity.icon(), notice.message),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!(" {}", notice.detail),
                Style::default().fg(C_SECONDARY),
            )),
            Line::from(""),
        ];
        let footer = if self.queue.len() > 1 {
            format!(" enter/esc to dismiss · {} more", self.queue.len() - 1)
        } else {
            " enter/esc to dismiss".to_string()
        };
        lines.push(Line::from(Span::styled(footer, Style::default().fg(C_MUTED))));

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color))
                        .style(Style::default().bg(C_POPUP_BG)),
                )
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::PlayerStatus;
    use ratatui::crossterm::event::KeyModifiers;

    #[test]
    fn test_notices_queue_and_dismiss_in_order() {
        let mut stack = NoticeStack::new();
        let state = AppState::new(PlayerStatus::Unavailable("none".to_string()));
        stack.warning("No media player found", "Install VLC");
        stack.error("Cannot play", "No media player is installed");
        stack.warning("No media player found", "Install VLC");
        assert!(stack.is_visible());

        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert!(stack.handle_key(key, &state).is_empty());

        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let actions = stack.handle_key(enter, &state);
        assert!(matches!(actions.as_slice(), [Action::DismissNotice]));
        stack.on_action(&Action::DismissNotice, &state);
        assert_eq!(stack.current().unwrap().message, "Cannot play");
        stack.on_action(&Action::DismissNotice, &state);
        assert!(!stack.is_visible());
    }
}
