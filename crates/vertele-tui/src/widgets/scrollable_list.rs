//! Generic scrollable + filterable list widget.
//!
//! The highlight is optional: a filter that hides the highlighted row clears
//! it instead of jumping to another row.

pub struct ScrollableList<T> {
    pub items: Vec<T>,
    pub filtered_indices: Vec<usize>,
    /// Position in `filtered_indices`, not in `items`.
    pub selected: Option<usize>,
    pub scroll_offset: usize,
    pub filter: String,
    filter_fn: Box<dyn Fn(&T, &str) -> bool>,
}

impl<T> ScrollableList<T> {
    pub fn new(filter_fn: impl Fn(&T, &str) -> bool + 'static) -> Self {
        Self {
            items: Vec::new(),
            filtered_indices: Vec::new(),
            selected: None,
            scroll_offset: 0,
            filter: String::new(),
            filter_fn: Box::new(filter_fn),
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.rebuild_filter();
    }

    pub fn set_filter(&mut self, query: &str) {
        self.filter = query.to_string();
        let old_idx = self.selected_original_index();
        self.rebuild_filter();
        self.selected =
            old_idx.and_then(|prev| self.filtered_indices.iter().position(|&i| i == prev));
        self.scroll_offset = 0;
    }

    pub fn rebuild_filter(&mut self) {
        if self.filter.is_empty() {
            self.filtered_indices = (0..self.items.len()).collect();
        } else {
            self.filtered_indices = self
                .items
                .iter()
                .enumerate()
                .filter(|(_, item)| (self.filter_fn)(item, &self.filter))
                .map(|(i, _)| i)
                .collect();
        }
        if let Some(sel) = self.selected {
            if sel >= self.filtered_indices.len() {
                self.selected = self.filtered_indices.len().checked_sub(1);
            }
        }
    }

    pub fn select_up(&mut self, n: usize) {
        if self.filtered_indices.is_empty() {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |s| s.saturating_sub(n)));
    }

    pub fn select_down(&mut self, n: usize) {
        if self.filtered_indices.is_empty() {
            return;
        }
        let last = self.filtered_indices.len() - 1;
        self.selected = Some(self.selected.map_or(0, |s| (s + n).min(last)));
    }

    pub fn select_first(&mut self) {
        self.selected = if self.filtered_indices.is_empty() {
            None
        } else {
            Some(0)
        };
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.filtered_indices.len().checked_sub(1);
    }

    pub fn selected_item(&self) -> Option<&T> {
        let idx = self.selected_original_index()?;
        self.items.get(idx)
    }

    pub fn selected_original_index(&self) -> Option<usize> {
        self.filtered_indices.get(self.selected?).copied()
    }

    /// Returns (original_index, &item) pairs visible in `height` rows.
    /// Call ensure_visible first to update scroll_offset.
    pub fn visible_items(&self, height: usize) -> Vec<(usize, &T)> {
        if height == 0 || self.filtered_indices.is_empty() {
            return Vec::new();
        }
        let start = self.scroll_offset.min(self.filtered_indices.len());
        let end = (start + height).min(self.filtered_indices.len());
        self.filtered_indices[start..end]
            .iter()
            .map(|&i| (i, &self.items[i]))
            .collect()
    }

    /// Adjust scroll_offset so the highlighted row is within `height` rows.
    pub fn ensure_visible(&mut self, height: usize) {
        let Some(selected) = self.selected else {
            return;
        };
        if height == 0 {
            return;
        }
        if selected < self.scroll_offset {
            self.scroll_offset = selected;
        } else if selected >= self.scroll_offset + height {
            self.scroll_offset = selected.saturating_sub(height - 1);
        }
    }

    /// Handle a click at `row` within a rendered area `height` rows tall.
    /// Returns true if selection changed. Rows outside the view are ignored.
    pub fn handle_click(&mut self, row: usize, height: usize) -> bool {
        if row >= height {
            return false;
        }
        let target = self.scroll_offset + row;
        if target < self.filtered_indices.len() {
            self.selected = Some(target);
            return true;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.filtered_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered_indices.is_empty()
    }

    pub fn total_len(&self) -> usize {
        self.items.len()
    }

    /// Row of the highlight within the current view, if it has one.
    pub fn selected_in_view(&self, height: usize) -> Option<usize> {
        let selected = self.selected?;
        Some(
            selected
                .saturating_sub(self.scroll_offset)
                .min(height.saturating_sub(1)),
        )
    }
}
