//! Standalone egui-based searchable popover action menu.
//!
//! A popover presents a filterable list of actionable rows anchored to a
//! trigger element. Items carry an action payload handed back to the host
//! when a row fires; destructive rows can require a two-click confirmation,
//! and rows come from an injectable [`ItemSource`]: a synchronous local
//! filter or a debounced remote lookup through an [`ItemFetcher`].

pub mod builder;
pub mod matcher;
pub mod source;
pub mod state;
pub mod types;

mod widget;

pub use builder::PopoverMenuBuilder;
pub use matcher::ItemMatcher;
pub use source::{FetchReply, ItemFetcher, ItemSource, LocalSource, RemoteSource};
pub use state::PopoverMenu;
pub use types::{HidePredicate, PopoverItem, RowContent};
