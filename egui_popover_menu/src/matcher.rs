//! Search predicate for live filtering of menu items.

use log::error;
use regex::{Regex, RegexBuilder};

/// Case-insensitive subsequence matcher built from the search field text.
///
/// The query characters must appear in the label in order, with arbitrary
/// gaps between them. Regex metacharacters in the query are escaped and
/// match literally. An empty (or all-whitespace) query matches everything.
#[derive(Clone, Debug)]
pub struct ItemMatcher {
    pattern: Option<Regex>,
}

impl ItemMatcher {
    pub fn new(query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            return Self { pattern: None };
        }
        let pattern = query
            .chars()
            .map(|c| regex::escape(&c.to_string()))
            .collect::<Vec<_>>()
            .join(".*");
        match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(regex) => Self {
                pattern: Some(regex),
            },
            Err(e) => {
                // Escaped input always compiles; fall back to match-all.
                error!("Failed to compile search pattern {:?}: {}", pattern, e);
                Self { pattern: None }
            }
        }
    }

    /// Whether `label` contains the query as an ordered subsequence.
    pub fn matches(&self, label: &str) -> bool {
        match &self.pattern {
            Some(regex) => regex.is_match(label),
            None => true,
        }
    }
}
