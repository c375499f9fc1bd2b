//! Lightweight data types for the popover menu.

use std::fmt;
use std::sync::Arc;

/// Predicate re-evaluated on every [`open`](crate::PopoverMenu::open); the
/// row is hidden (not removed) while it returns true.
pub type HidePredicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// Custom row painter, replacing the default icon + label rendering.
pub type RowContent = Arc<dyn Fn(&mut egui::Ui) + Send + Sync>;

/// A single entry in a popover menu.
#[derive(Clone)]
pub struct PopoverItem<A: Clone> {
    /// Display text and default search target.
    pub label: String,
    /// Icon glyph rendered before the label (e.g. an `egui_phosphor` char).
    pub icon: Option<String>,
    /// Payload handed back to the host when the row fires. A clickable row
    /// without an action is a broken host item list.
    pub action: Option<A>,
    /// First click arms the row; only the second click fires the action.
    pub confirmation_required: bool,
    /// Hides the row while the predicate holds.
    pub hide_if: Option<HidePredicate>,
    /// Overrides icon + label rendering for this row.
    pub content: Option<RowContent>,
}

impl<A: Clone> PopoverItem<A> {
    pub fn new(label: impl Into<String>, action: A) -> Self {
        Self {
            label: label.into(),
            icon: None,
            action: Some(action),
            confirmation_required: false,
            hide_if: None,
            content: None,
        }
    }

    /// Set the icon glyph (builder).
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Require two-step confirmation before the action fires (builder).
    pub fn with_confirmation(mut self) -> Self {
        self.confirmation_required = true;
        self
    }

    /// Hide the row while `predicate` returns true (builder).
    pub fn hide_when(mut self, predicate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.hide_if = Some(Arc::new(predicate));
        self
    }

    /// Replace icon + label rendering with a custom painter (builder).
    pub fn with_content(mut self, content: impl Fn(&mut egui::Ui) + Send + Sync + 'static) -> Self {
        self.content = Some(Arc::new(content));
        self
    }
}

impl<A: Clone + fmt::Debug> fmt::Debug for PopoverItem<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopoverItem")
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("action", &self.action)
            .field("confirmation_required", &self.confirmation_required)
            .field("hide_if", &self.hide_if.as_ref().map(|_| "<predicate>"))
            .field("content", &self.content.as_ref().map(|_| "<content>"))
            .finish()
    }
}
