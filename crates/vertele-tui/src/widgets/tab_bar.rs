//! Category tab strip above the channel list.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{C_ACCENT, C_MUTED, C_PRIMARY, C_SECONDARY, C_SELECTION_BG};

pub struct Tab<'a> {
    pub name: &'a str,
    pub count: usize,
}

/// Labels as rendered, `"1 Movies 5"`; numbering matches the digit shortcuts.
pub fn tab_labels(tabs: &[Tab<'_>]) -> Vec<String> {
    tabs.iter()
        .enumerate()
        .map(|(i, t)| {
            if i < 9 {
                format!("{} {} {}", i + 1, t.name, t.count)
            } else {
                format!("{} {}", t.name, t.count)
            }
        })
        .collect()
}

/// Index of the tab under column `x`, for mouse clicks.
pub fn tab_at(tabs: &[Tab<'_>], area: Rect, x: u16) -> Option<usize> {
    let mut col = area.x;
    for (i, label) in tab_labels(tabs).iter().enumerate() {
        let w = label.width() as u16 + 2;
        if x >= col && x < col + w {
            return Some(i);
        }
        col += w + 1;
    }
    None
}

pub fn draw_tab_bar(frame: &mut Frame, area: Rect, tabs: &[Tab<'_>], active: usize) {
    let mut spans = Vec::new();
    for (i, (tab, label)) in tabs.iter().zip(tab_labels(tabs)).enumerate() {
        let style = if i == active {
            Style::default()
                .fg(C_PRIMARY)
                .bg(C_SELECTION_BG)
                .add_modifier(Modifier::BOLD)
        } else if tab.count == 0 {
            Style::default().fg(C_MUTED)
        } else {
            Style::default().fg(C_SECONDARY)
        };
        spans.push(Span::styled(format!(" {} ", label), style));
        spans.push(Span::styled("│", Style::default().fg(C_MUTED)));
    }
    if spans.is_empty() {
        spans.push(Span::styled(" no categories", Style::default().fg(C_ACCENT)));
    } else {
        spans.pop();
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
