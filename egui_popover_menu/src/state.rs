//! Open/close, row confirmation, and filtered-view state for the popover.

use std::time::Instant;

use crate::source::{ItemSource, LocalSource};
use crate::types::PopoverItem;

/// Transient per-row flags, parallel-indexed to the current item view.
///
/// Rebuilt whenever the view is replaced, which is what clears armed
/// confirmations on re-render.
#[derive(Clone, Copy, Default, Debug)]
struct RowState {
    armed: bool,
    hidden: bool,
}

/// A searchable popover menu over an injectable item source.
///
/// # Invariants
///
/// 1. `items` and the per-row flags are the same length and index-aligned
///    after every view replacement.
/// 2. Row identity is its index in the current view; replacing the view
///    resets every row flag.
/// 3. `close()` disarms every row; `open()` re-evaluates every `hide_if`
///    predicate fresh.
pub struct PopoverMenu<A: Clone> {
    source: Box<dyn ItemSource<A>>,
    items: Vec<PopoverItem<A>>,
    rows: Vec<RowState>,
    query: String,
    visible: bool,
    selected_index: usize,
}

impl<A: Clone + 'static> PopoverMenu<A> {
    /// Popover over a fixed item list, filtered locally as the user types.
    pub fn local(items: Vec<PopoverItem<A>>) -> Self {
        let initial = items.clone();
        Self::with_source(initial, LocalSource::new(items))
    }

    /// Popover over an arbitrary source strategy, starting from `initial`.
    pub fn with_source(
        initial: Vec<PopoverItem<A>>,
        source: impl ItemSource<A> + 'static,
    ) -> Self {
        let rows = vec![RowState::default(); initial.len()];
        Self {
            source: Box::new(source),
            items: initial,
            rows,
            query: String::new(),
            visible: false,
            selected_index: 0,
        }
    }

    // --- View ---

    /// Current (possibly filtered) item view.
    pub fn items(&self) -> &[PopoverItem<A>] {
        &self.items
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Number of rows in the current view.
    pub fn row_count(&self) -> usize {
        self.items.len()
    }

    /// Number of rows not currently hidden.
    pub fn visible_row_count(&self) -> usize {
        self.rows.iter().filter(|row| !row.hidden).count()
    }

    /// Replace the item view wholesale. All row flags reset.
    pub fn render_items(&mut self, new_items: Vec<PopoverItem<A>>) {
        self.rows = vec![RowState::default(); new_items.len()];
        self.items = new_items;
        self.clamp_selection();
    }

    /// Forward a search-text change to the source.
    pub fn set_query(&mut self, text: &str, now: Instant) {
        if text == self.query {
            return;
        }
        self.query = text.to_string();
        self.source.query_changed(&self.query, now);
    }

    /// Apply a replacement view from the source, if one is ready.
    pub fn poll(&mut self, now: Instant) {
        if let Some(view) = self.source.poll(now) {
            self.render_items(view);
        }
    }

    pub(crate) fn next_wakeup(&self, now: Instant) -> Option<Instant> {
        self.source.next_wakeup(now)
    }

    // --- Visibility ---

    /// Show the menu, re-evaluating every `hide_if` predicate fresh.
    /// Idempotent.
    pub fn open(&mut self) {
        for (item, row) in self.items.iter().zip(&mut self.rows) {
            row.hidden = item.hide_if.as_ref().map(|p| p()).unwrap_or(false);
        }
        self.visible = true;
    }

    /// Hide the menu and disarm every row.
    pub fn close(&mut self) {
        self.visible = false;
        for row in &mut self.rows {
            row.armed = false;
        }
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    // --- Clicks ---

    /// Resolve a click on row `index` against the confirmation policy.
    ///
    /// Returns the action when the click fires, `None` when it only armed
    /// the row or landed on no row. Armed rows stay armed; a further click
    /// fires again.
    pub fn row_clicked(&mut self, index: usize) -> Option<A> {
        let item = self.items.get(index)?;
        let row = self.rows.get_mut(index)?;
        if item.confirmation_required && !row.armed {
            row.armed = true;
            return None;
        }
        match &item.action {
            Some(action) => Some(action.clone()),
            // A clickable row without an action is a broken host item list.
            None => panic!("Popover item {:?} has no action", item.label),
        }
    }

    pub fn is_row_armed(&self, index: usize) -> bool {
        self.rows.get(index).map(|row| row.armed).unwrap_or(false)
    }

    pub fn is_row_hidden(&self, index: usize) -> bool {
        self.rows.get(index).map(|row| row.hidden).unwrap_or(false)
    }

    // --- Keyboard selection ---

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Move the keyboard selection down, skipping hidden rows.
    pub fn select_next(&mut self) {
        let mut index = self.selected_index;
        while index + 1 < self.rows.len() {
            index += 1;
            if !self.rows[index].hidden {
                self.selected_index = index;
                return;
            }
        }
    }

    /// Move the keyboard selection up, skipping hidden rows.
    pub fn select_previous(&mut self) {
        let mut index = self.selected_index;
        while index > 0 {
            index -= 1;
            if !self.rows[index].hidden {
                self.selected_index = index;
                return;
            }
        }
    }

    fn clamp_selection(&mut self) {
        if self.items.is_empty() {
            self.selected_index = 0;
        } else {
            self.selected_index = self.selected_index.min(self.items.len() - 1);
        }
    }
}
