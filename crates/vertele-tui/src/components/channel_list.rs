//! ChannelList component — category tabs over the channel list.

use std::time::Instant;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use vertele_core::channel::Channel;

use crate::{
    action::Action,
    app_state::{AppState, PlayerStatus},
    browser::ChannelBrowser,
    component::Component,
    theme::{C_BADGE_ERR, C_LINK, C_MUTED, C_PLAYING, C_PRIMARY, C_SECONDARY, C_SELECTION_BG},
    widgets::{
        filter_input::{FilterAction, FilterInput},
        pane_chrome::{pane_chrome, Badge},
        tab_bar::{draw_tab_bar, tab_at, Tab},
    },
};

pub struct ChannelList {
    pub browser: ChannelBrowser,
    filter_input: FilterInput,
    list_state: ListState,
    /// Areas from the last draw, for mouse hit-testing.
    tab_area: Rect,
    /// Channel rows only: no border, no filter line.
    rows_area: Rect,
    /// Track last click (row index, time) for double-click detection.
    last_click: Option<(usize, Instant)>,
}

impl ChannelList {
    pub fn new(browser: ChannelBrowser) -> Self {
        Self {
            browser,
            filter_input: FilterInput::new("channel title…"),
            list_state: ListState::default(),
            tab_area: Rect::default(),
            rows_area: Rect::default(),
            last_click: None,
        }
    }

    pub fn is_filter_active(&self) -> bool {
        self.filter_input.is_active()
    }

    fn switch_to(&mut self, idx: usize) {
        self.browser.switch_category(idx);
        self.after_switch();
    }

    fn after_switch(&mut self) {
        // Each category carries its own filter text.
        self.filter_input.set_value(self.browser.filter());
        self.filter_input.deactivate();
        self.last_click = None;
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Up => {
                self.browser.select_up(1);
                return vec![];
            }
            KeyCode::Down => {
                self.browser.select_down(1);
                return vec![];
            }
            _ => {}
        }
        match self.filter_input.handle_key(key) {
            FilterAction::Changed(q) => {
                self.browser.set_filter(&q);
                vec![]
            }
            FilterAction::Confirmed => vec![Action::CloseFilter],
            FilterAction::Cancelled => {
                self.browser.set_filter("");
                vec![Action::CloseFilter]
            }
        }
    }

    fn render_item(
        channel: &Channel,
        is_selected: bool,
        width: usize,
        state: &AppState,
    ) -> ListItem<'static> {
        let launched = state.last_launched.as_deref() == Some(channel.instance.as_str());
        let (marker, marker_color) = if launched {
            ("▸ ", C_PLAYING)
        } else {
            ("  ", C_MUTED)
        };

        let title_style = if is_selected {
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(C_SECONDARY)
        };

        let title_room = width.saturating_sub(marker.width());
        let title = truncate(&channel.title, title_room);
        let mut spans = vec![
            Span::styled(marker, Style::default().fg(marker_color)),
            Span::styled(title.clone(), title_style),
        ];

        // Homepage link only on the highlighted row, when it fits.
        if is_selected {
            if let Some(page) = channel.page_url.as_deref() {
                let room = title_room.saturating_sub(title.width() + 2);
                if room > 8 {
                    spans.push(Span::raw("  "));
                    spans.push(Span::styled(truncate(page, room), Style::default().fg(C_LINK)));
                }
            }
        }

        let bg = if is_selected {
            Style::default().bg(C_SELECTION_BG)
        } else {
            Style::default()
        };
        ListItem::new(Line::from(spans)).style(bg)
    }
}

/// Cut `s` to at most `max` display columns, marking the cut with `…`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

impl Component for ChannelList {
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        if self.filter_input.is_active() {
            return self.handle_filter_key(key);
        }

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.browser.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.browser.select_down(step),
            KeyCode::PageUp => self.browser.select_up(10),
            KeyCode::PageDown => self.browser.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.browser.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.browser.select_last(),

            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
                self.browser.prev_category();
                self.after_switch();
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
                self.browser.next_category();
                self.after_switch();
            }
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                self.switch_to(idx);
            }

            KeyCode::Enter | KeyCode::Char(' ') => return vec![Action::PlaySelected],

            KeyCode::Char('/') => {
                self.filter_input.set_value(self.browser.filter());
                self.filter_input.activate();
                return vec![Action::OpenFilter];
            }

            KeyCode::Char('y') => {
                if let Some(ch) = self.browser.selected() {
                    return vec![Action::CopyToClipboard(ch.stream_url.clone())];
                }
            }

            _ => {}
        }

        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.browser.select_up(1),
            MouseEventKind::ScrollDown => self.browser.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                if event.row == self.tab_area.y && self.tab_area.height > 0 {
                    let tabs: Vec<Tab> = self
                        .browser
                        .panels()
                        .iter()
                        .map(|p| Tab {
                            name: &p.name,
                            count: p.list.total_len(),
                        })
                        .collect();
                    if let Some(idx) = tab_at(&tabs, self.tab_area, event.column) {
                        self.switch_to(idx);
                    }
                    return vec![];
                }

                if !self.rows_area.contains(Position::new(event.column, event.row)) {
                    return vec![];
                }
                let rel_row = (event.row - self.rows_area.y) as usize;
                let now = Instant::now();
                let is_double = self
                    .last_click
                    .map(|(row, t)| row == rel_row && t.elapsed().as_millis() < 400)
                    .unwrap_or(false);

                let height = self.rows_area.height as usize;
                if self.browser.click_row(rel_row, height) && is_double {
                    self.last_click = None;
                    return vec![Action::PlaySelected];
                }
                self.last_click = Some((rel_row, now));
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::CloseFilter = action {
            self.filter_input.deactivate();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let [tab_area, list_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
        self.tab_area = tab_area;
        self.rows_area = Rect::default();

        {
            let tabs: Vec<Tab> = self
                .browser
                .panels()
                .iter()
                .map(|p| Tab {
                    name: &p.name,
                    count: p.list.total_len(),
                })
                .collect();
            draw_tab_bar(frame, tab_area, &tabs, self.browser.active_index());
        }

        let badge = match state.player {
            PlayerStatus::Unavailable(_) => Some(Badge {
                text: "NO PLAYER",
                color: C_BADGE_ERR,
            }),
            _ => None,
        };

        let filter_visible = self.filter_input.is_active() || !self.browser.filter().is_empty();
        let Some(panel) = self.browser.active_panel_mut() else {
            frame.render_widget(pane_chrome("channels", None, focused, badge), list_area);
            return;
        };
        let name = panel.name.clone();
        let block = pane_chrome(&name, Some(panel.list.len()), focused, badge);
        let inner = block.inner(list_area);
        frame.render_widget(block, list_area);

        let (rows_area, filter_area) = if filter_visible && inner.height > 1 {
            let [rows, filter] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
            (rows, Some(filter))
        } else {
            (inner, None)
        };
        self.rows_area = rows_area;

        let empty_msg = if panel.list.total_len() == 0 {
            Some("  no channels in this category")
        } else if panel.list.is_empty() {
            Some("  no channels match filter")
        } else {
            None
        };

        if let Some(msg) = empty_msg {
            frame.render_widget(
                Paragraph::new(Span::styled(msg, Style::default().fg(C_MUTED))),
                rows_area,
            );
        } else {
            let content_h = rows_area.height as usize;
            panel.list.ensure_visible(content_h);
            let sel_in_view = panel.list.selected_in_view(content_h);
            let width = rows_area.width as usize;
            let items: Vec<ListItem> = panel
                .list
                .visible_items(content_h)
                .into_iter()
                .enumerate()
                .map(|(row, (_, ch))| Self::render_item(ch, Some(row) == sel_in_view, width, state))
                .collect();

            self.list_state.select(sel_in_view);
            frame.render_stateful_widget(List::new(items), rows_area, &mut self.list_state);
        }

        if let Some(filter_area) = filter_area {
            if let Some(panel) = self.browser.active_panel() {
                self.filter_input
                    .draw(frame, filter_area, panel.list.len(), panel.list.total_len());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::PlayerStatus;
    use ratatui::{backend::TestBackend, Terminal};
    use vertele_core::categories::CategoryTable;

    fn component() -> ChannelList {
        let mut browser = ChannelBrowser::new(CategoryTable::builtin());
        browser.add_channel(
            "Sintel",
            "sintel",
            Some("https://durian.blender.org/"),
            "https://example.invalid/sintel.m3u8",
        );
        browser.add_channel("NASA TV", "nasatv", None, "https://example.invalid/nasa.m3u8");
        browser.select_default();
        ChannelList::new(browser)
    }

    fn press(list: &mut ChannelList, code: KeyCode) -> Vec<Action> {
        let state = AppState::new(PlayerStatus::Override("mpv".to_string()));
        list.handle_key(KeyEvent::new(code, KeyModifiers::NONE), &state)
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("NASA TV", 10), "NASA TV");
        assert_eq!(truncate("Big Buck Bunny", 6), "Big B…");
        assert_eq!(truncate("Sintel", 0), "");
    }

    #[test]
    fn test_enter_requests_play() {
        let mut list = component();
        assert!(matches!(
            press(&mut list, KeyCode::Enter).as_slice(),
            [Action::PlaySelected]
        ));
    }

    #[test]
    fn test_filter_keys_drive_browser() {
        let mut list = component();
        assert!(matches!(
            press(&mut list, KeyCode::Char('/')).as_slice(),
            [Action::OpenFilter]
        ));
        assert!(list.is_filter_active());
        press(&mut list, KeyCode::Char('z'));
        assert_eq!(list.browser.filter(), "z");
        assert!(!list.browser.can_play());

        // Esc clears, second Esc closes.
        press(&mut list, KeyCode::Esc);
        assert_eq!(list.browser.filter(), "");
        assert!(matches!(
            press(&mut list, KeyCode::Esc).as_slice(),
            [Action::CloseFilter]
        ));
        assert!(!list.is_filter_active());
    }

    #[test]
    fn test_digit_switches_category() {
        let mut list = component();
        // Documentaries is the third tab in the bundled table.
        press(&mut list, KeyCode::Char('3'));
        assert_eq!(list.browser.selected().unwrap().instance, "nasatv");
    }

    #[test]
    fn test_copy_uses_stream_url() {
        let mut list = component();
        match press(&mut list, KeyCode::Char('y')).as_slice() {
            [Action::CopyToClipboard(url)] => {
                assert_eq!(url, "https://example.invalid/sintel.m3u8")
            }
            other => panic!("unexpected actions {:?}", other),
        }
    }

    #[test]
    fn test_draw_renders_tabs_and_rows() {
        let mut list = component();
        let state = AppState::new(PlayerStatus::Unavailable("none".to_string()));
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        terminal
            .draw(|f| list.draw(f, f.area(), true, &state))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("1 Movies 1"));
        assert!(text.contains("Sintel"));
        assert!(text.contains("NO PLAYER"));
    }

    fn click(list: &mut ChannelList, column: u16, row: u16) -> Vec<Action> {
        let state = AppState::new(PlayerStatus::Override("mpv".to_string()));
        list.handle_mouse(
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            },
            Rect::default(),
            &state,
        )
    }

    #[test]
    fn test_clicks_outside_drawn_rows_are_ignored() {
        let mut browser = ChannelBrowser::new(CategoryTable::builtin());
        for (title, instance) in [
            ("Big Buck Bunny", "bigbuckbunny"),
            ("Tears of Steel", "tearsofsteel"),
            ("Sintel", "sintel"),
        ] {
            browser.add_channel(title, instance, None, "https://example.invalid/live.m3u8");
        }
        browser.select_default();
        let mut list = ChannelList::new(browser);

        // Tab row, then a bordered pane with room for a single channel row.
        let state = AppState::new(PlayerStatus::Override("mpv".to_string()));
        let mut terminal = Terminal::new(TestBackend::new(40, 4)).unwrap();
        terminal
            .draw(|f| list.draw(f, f.area(), true, &state))
            .unwrap();

        // Bottom border, twice: no hidden row gets selected or played.
        assert!(click(&mut list, 5, 3).is_empty());
        assert!(click(&mut list, 5, 3).is_empty());
        assert_eq!(list.browser.selected().unwrap().instance, "bigbuckbunny");

        // Left border of the visible row.
        assert!(click(&mut list, 0, 2).is_empty());

        // The visible row itself still takes a double-click.
        assert!(click(&mut list, 5, 2).is_empty());
        assert!(matches!(
            click(&mut list, 5, 2).as_slice(),
            [Action::PlaySelected]
        ));
    }
}
