//! Declarative construction of popover menus.

use crate::source::{ItemFetcher, RemoteSource};
use crate::state::PopoverMenu;
use crate::types::PopoverItem;

/// Builder for constructing popover menus declaratively.
pub struct PopoverMenuBuilder<A: Clone> {
    items: Vec<PopoverItem<A>>,
}

impl<A: Clone + 'static> PopoverMenuBuilder<A> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a clickable action item.
    pub fn action(mut self, label: impl Into<String>, action: A) -> Self {
        self.items.push(PopoverItem::new(label, action));
        self
    }

    /// Add a clickable action with an icon.
    pub fn action_with_icon(
        mut self,
        icon: impl Into<String>,
        label: impl Into<String>,
        action: A,
    ) -> Self {
        self.items.push(PopoverItem::new(label, action).with_icon(icon));
        self
    }

    /// Add a destructive action that arms on the first click and fires on
    /// the second.
    pub fn confirmed_action(
        mut self,
        icon: impl Into<String>,
        label: impl Into<String>,
        action: A,
    ) -> Self {
        self.items.push(
            PopoverItem::new(label, action)
                .with_icon(icon)
                .with_confirmation(),
        );
        self
    }

    /// Add a fully configured item.
    pub fn item(mut self, item: PopoverItem<A>) -> Self {
        self.items.push(item);
        self
    }

    /// Build a locally filtered popover over the collected items.
    pub fn build_local(self) -> PopoverMenu<A> {
        PopoverMenu::local(self.items)
    }

    /// Build a remote-backed popover. The collected items become the fixed
    /// head shown above fetched results, and the initial view.
    pub fn build_remote(self, fetcher: impl ItemFetcher<A> + 'static) -> PopoverMenu<A> {
        let source = RemoteSource::new(fetcher).with_head_items(self.items.clone());
        PopoverMenu::with_source(self.items, source)
    }
}
