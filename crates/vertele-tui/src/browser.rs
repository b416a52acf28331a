//! ChannelBrowser — categorized, filterable channel picker model.
//!
//! Terminal-independent: the channel list component renders it and feeds it
//! keys, but every selection rule lives here.
//!
//! One panel per category, in table order with the catch-all last. Each panel
//! keeps its own filter and highlight; the browser tracks at most one
//! selected channel, always the highlighted row of the active panel.

use tracing::{debug, warn};

use vertele_core::categories::CategoryTable;
use vertele_core::channel::{Channel, SelectedChannel};

use crate::widgets::scrollable_list::ScrollableList;

pub struct Panel {
    pub name: String,
    pub list: ScrollableList<Channel>,
}

impl Panel {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            list: ScrollableList::new(title_matches),
        }
    }
}

/// Case-insensitive substring match on the title. Empty query matches all.
fn title_matches(channel: &Channel, query: &str) -> bool {
    query.is_empty() || channel.title.to_lowercase().contains(&query.to_lowercase())
}

/// Outcome of a play activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayRequest {
    /// Nothing selected; the callback was not called.
    NoSelection,
    /// A channel is selected but nobody registered to receive it.
    NoHandler,
    Dispatched,
}

type PlayCallback = Box<dyn FnMut(&SelectedChannel)>;

pub struct ChannelBrowser {
    categories: CategoryTable,
    panels: Vec<Panel>,
    active: usize,
    selected: Option<SelectedChannel>,
    on_play: Option<PlayCallback>,
}

impl ChannelBrowser {
    pub fn new(categories: CategoryTable) -> Self {
        let panels = categories.names().into_iter().map(Panel::new).collect();
        Self {
            categories,
            panels,
            active: 0,
            selected: None,
            on_play: None,
        }
    }

    /// Register the receiver of play activations. Replaces any previous one.
    pub fn on_play(&mut self, callback: impl FnMut(&SelectedChannel) + 'static) {
        self.on_play = Some(Box::new(callback));
    }

    /// Add a row, placing it by title membership in the category table.
    pub fn add_channel(
        &mut self,
        title: &str,
        instance: &str,
        page_url: Option<&str>,
        stream_url: &str,
    ) {
        let category = self.categories.classify(title).to_string();
        self.insert(
            category.clone(),
            Channel {
                title: title.to_string(),
                instance: instance.to_string(),
                page_url: page_url.map(str::to_string),
                stream_url: stream_url.to_string(),
                category,
            },
        );
    }

    /// Add a stored channel; its persisted category is honoured when configured.
    pub fn add_channel_entry(&mut self, channel: Channel) {
        let category = self.categories.classify_channel(&channel).to_string();
        self.insert(category, channel);
    }

    fn insert(&mut self, category: String, channel: Channel) {
        let idx = match self.panels.iter().position(|p| p.name == category) {
            Some(idx) => idx,
            None => {
                // classify() only returns configured names; keep the row anyway.
                warn!("category '{}' has no panel, adding one", category);
                self.panels.push(Panel::new(&category));
                self.panels.len() - 1
            }
        };
        debug!("browser: '{}' -> {}", channel.title, category);
        self.panels[idx].list.push(channel);
    }

    /// Highlight the first row of the first non-empty panel and make it active.
    pub fn select_default(&mut self) {
        if let Some(idx) = self.panels.iter().position(|p| p.list.total_len() > 0) {
            self.active = idx;
            self.panels[idx].list.select_first();
        }
        self.sync_selection();
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_panel(&self) -> Option<&Panel> {
        self.panels.get(self.active)
    }

    pub fn active_panel_mut(&mut self) -> Option<&mut Panel> {
        self.panels.get_mut(self.active)
    }

    pub fn total_channels(&self) -> usize {
        self.panels.iter().map(|p| p.list.total_len()).sum()
    }

    pub fn selected(&self) -> Option<&SelectedChannel> {
        self.selected.as_ref()
    }

    /// Play is enabled exactly when a channel is selected.
    pub fn can_play(&self) -> bool {
        self.selected.is_some()
    }

    /// Filter the active panel. Rows are hidden, never dropped.
    pub fn set_filter(&mut self, text: &str) {
        if let Some(panel) = self.active_panel_mut() {
            panel.list.set_filter(text);
        }
        self.sync_selection();
    }

    pub fn filter(&self) -> &str {
        self.active_panel().map_or("", |p| p.list.filter.as_str())
    }

    pub fn select_up(&mut self, n: usize) {
        if let Some(panel) = self.active_panel_mut() {
            panel.list.select_up(n);
        }
        self.sync_selection();
    }

    pub fn select_down(&mut self, n: usize) {
        if let Some(panel) = self.active_panel_mut() {
            panel.list.select_down(n);
        }
        self.sync_selection();
    }

    pub fn select_first(&mut self) {
        if let Some(panel) = self.active_panel_mut() {
            panel.list.select_first();
        }
        self.sync_selection();
    }

    pub fn select_last(&mut self) {
        if let Some(panel) = self.active_panel_mut() {
            panel.list.select_last();
        }
        self.sync_selection();
    }

    /// Click on the `row`-th visible row of the active panel, whose view is
    /// `height` rows tall.
    pub fn click_row(&mut self, row: usize, height: usize) -> bool {
        let changed = self
            .active_panel_mut()
            .is_some_and(|panel| panel.list.handle_click(row, height));
        self.sync_selection();
        changed
    }

    /// Make panel `idx` active. Its highlighted row becomes the selection,
    /// the first row if it has never been highlighted.
    pub fn switch_category(&mut self, idx: usize) {
        if idx >= self.panels.len() {
            return;
        }
        self.active = idx;
        let list = &mut self.panels[idx].list;
        if list.selected.is_none() && list.filter.is_empty() {
            list.select_first();
        }
        self.sync_selection();
    }

    pub fn next_category(&mut self) {
        if !self.panels.is_empty() {
            self.switch_category((self.active + 1) % self.panels.len());
        }
    }

    pub fn prev_category(&mut self) {
        if !self.panels.is_empty() {
            let len = self.panels.len();
            self.switch_category((self.active + len - 1) % len);
        }
    }

    /// Hand the selected channel to the registered callback.
    pub fn play(&mut self) -> PlayRequest {
        let Some(selected) = self.selected.as_ref() else {
            warn!("play requested with no channel selected");
            return PlayRequest::NoSelection;
        };
        match self.on_play.as_mut() {
            Some(callback) => {
                callback(selected);
                PlayRequest::Dispatched
            }
            None => {
                warn!("play requested but no handler is registered");
                PlayRequest::NoHandler
            }
        }
    }

    fn sync_selection(&mut self) {
        self.selected = self
            .panels
            .get(self.active)
            .and_then(|p| p.list.selected_item())
            .map(SelectedChannel::from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn browser() -> ChannelBrowser {
        let mut b = ChannelBrowser::new(CategoryTable::builtin());
        b.add_channel(
            "Sintel",
            "sintel",
            Some("https://durian.blender.org/"),
            "https://example.invalid/sintel.m3u8",
        );
        b.add_channel(
            "Big Buck Bunny",
            "bigbuckbunny",
            None,
            "https://example.invalid/bbb.m3u8",
        );
        b.add_channel("NASA TV", "nasatv", None, "https://example.invalid/nasa.m3u8");
        b.add_channel("Local News", "localnews", None, "https://example.invalid/news.m3u8");
        b
    }

    fn panel<'a>(b: &'a ChannelBrowser, name: &str) -> &'a Panel {
        b.panels().iter().find(|p| p.name == name).unwrap()
    }

    #[test]
    fn test_channels_land_in_their_category() {
        let b = browser();
        assert_eq!(panel(&b, "Movies").list.total_len(), 2);
        assert_eq!(panel(&b, "Documentaries").list.total_len(), 1);
        assert_eq!(panel(&b, "Other").list.total_len(), 1);
        assert_eq!(panel(&b, "Sports").list.total_len(), 0);
        assert_eq!(b.total_channels(), 4);
    }

    #[test]
    fn test_nothing_selected_until_default() {
        let mut b = browser();
        assert!(!b.can_play());
        b.select_default();
        assert!(b.can_play());
        assert_eq!(b.active_panel().unwrap().name, "Movies");
        // First row in insertion order, not alphabetical.
        assert_eq!(b.selected().unwrap().title, "Sintel");
    }

    #[test]
    fn test_select_default_skips_empty_panels() {
        let mut b = ChannelBrowser::new(CategoryTable::builtin());
        b.add_channel("NASA TV", "nasatv", None, "https://example.invalid/nasa.m3u8");
        b.select_default();
        assert_eq!(b.active_panel().unwrap().name, "Documentaries");
        assert_eq!(b.selected().unwrap().instance, "nasatv");
    }

    #[test]
    fn test_empty_browser_select_default_is_noop() {
        let mut b = ChannelBrowser::new(CategoryTable::builtin());
        b.select_default();
        assert!(!b.can_play());
        assert_eq!(b.play(), PlayRequest::NoSelection);
    }

    #[test]
    fn test_play_without_selection_skips_callback() {
        let mut b = browser();
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        b.on_play(move |_| *counter.borrow_mut() += 1);

        assert_eq!(b.play(), PlayRequest::NoSelection);
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_play_passes_selected_fields_once() {
        let mut b = browser();
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = received.clone();
        b.on_play(move |ch| sink.borrow_mut().push(ch.clone()));

        b.select_default();
        assert_eq!(b.play(), PlayRequest::Dispatched);

        let received = received.borrow();
        assert_eq!(received.len(), 1);
        assert_eq!(
            received[0],
            SelectedChannel {
                title: "Sintel".to_string(),
                instance: "sintel".to_string(),
                page_url: Some("https://durian.blender.org/".to_string()),
                stream_url: "https://example.invalid/sintel.m3u8".to_string(),
            }
        );
    }

    #[test]
    fn test_play_without_handler() {
        let mut b = browser();
        b.select_default();
        assert_eq!(b.play(), PlayRequest::NoHandler);
    }

    #[test]
    fn test_filter_hides_and_restores_rows() {
        let mut b = browser();
        b.select_default();
        b.set_filter("zzz-not-there");
        assert_eq!(b.active_panel().unwrap().list.len(), 0);
        assert!(!b.can_play());

        b.set_filter("");
        assert_eq!(b.active_panel().unwrap().list.len(), 2);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let mut b = browser();
        b.select_default();
        b.set_filter("BUNNY");
        let panel = b.active_panel().unwrap();
        assert_eq!(panel.list.len(), 1);
        assert_eq!(panel.list.items[panel.list.filtered_indices[0]].title, "Big Buck Bunny");
        // Sintel was highlighted and is now hidden.
        assert!(b.selected().is_none());
        b.select_down(1);
        assert_eq!(b.selected().unwrap().instance, "bigbuckbunny");
    }

    #[test]
    fn test_filter_is_per_category() {
        let mut b = browser();
        b.select_default();
        b.set_filter("sintel");
        b.next_category();
        assert_eq!(b.filter(), "");
        b.prev_category();
        assert_eq!(b.filter(), "sintel");
    }

    #[test]
    fn test_switch_category_moves_selection() {
        let mut b = browser();
        b.select_default();
        let docs = b.panels().iter().position(|p| p.name == "Documentaries").unwrap();
        b.switch_category(docs);
        assert_eq!(b.selected().unwrap().title, "NASA TV");

        let sports = b.panels().iter().position(|p| p.name == "Sports").unwrap();
        b.switch_category(sports);
        assert!(!b.can_play());

        b.switch_category(99);
        assert_eq!(b.active_index(), sports);
    }

    #[test]
    fn test_navigation_updates_selection() {
        let mut b = browser();
        b.select_default();
        b.select_down(1);
        assert_eq!(b.selected().unwrap().instance, "bigbuckbunny");
        b.select_first();
        assert_eq!(b.selected().unwrap().instance, "sintel");
        b.select_last();
        assert_eq!(b.selected().unwrap().instance, "bigbuckbunny");
        b.select_up(1);
        assert_eq!(b.selected().unwrap().instance, "sintel");
    }

    #[test]
    fn test_stored_category_is_honoured() {
        let mut b = ChannelBrowser::new(CategoryTable::builtin());
        b.add_channel_entry(Channel {
            title: "Sintel".to_string(),
            instance: "sintel".to_string(),
            page_url: None,
            stream_url: "https://example.invalid/sintel.m3u8".to_string(),
            category: "Music".to_string(),
        });
        assert_eq!(panel(&b, "Music").list.total_len(), 1);
        assert_eq!(panel(&b, "Movies").list.total_len(), 0);
    }
}
