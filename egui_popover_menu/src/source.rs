//! Item-source strategies: where the popover's rows come from.
//!
//! A [`PopoverMenu`](crate::PopoverMenu) is polymorphic over [`ItemSource`]:
//! the local variant filters a fixed item list synchronously on every
//! keystroke, the remote variant debounces keystrokes and looks candidates
//! up through an [`ItemFetcher`] off the UI thread.

use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::matcher::ItemMatcher;
use crate::types::PopoverItem;

/// Strategy that turns the current search text into an item view.
pub trait ItemSource<A: Clone> {
    /// Notify the source that the search text changed.
    fn query_changed(&mut self, query: &str, now: Instant);

    /// Poll for a replacement item view. `None` while nothing new is ready.
    fn poll(&mut self, now: Instant) -> Option<Vec<PopoverItem<A>>>;

    /// Earliest instant at which polling again may yield new results.
    fn next_wakeup(&self, now: Instant) -> Option<Instant> {
        let _ = now;
        None
    }
}

/// Synchronous source: filters a fixed item list by label.
pub struct LocalSource<A: Clone> {
    items: Vec<PopoverItem<A>>,
    staged: Option<Vec<PopoverItem<A>>>,
}

impl<A: Clone> LocalSource<A> {
    pub fn new(items: Vec<PopoverItem<A>>) -> Self {
        Self {
            items,
            staged: None,
        }
    }
}

impl<A: Clone> ItemSource<A> for LocalSource<A> {
    fn query_changed(&mut self, query: &str, _now: Instant) {
        // Always filter the full original list, not the previous view.
        let matcher = ItemMatcher::new(query);
        let filtered = self
            .items
            .iter()
            .filter(|item| matcher.matches(&item.label))
            .cloned()
            .collect();
        self.staged = Some(filtered);
    }

    fn poll(&mut self, _now: Instant) -> Option<Vec<PopoverItem<A>>> {
        self.staged.take()
    }
}

/// Reply sent back by an [`ItemFetcher`] worker.
pub struct FetchReply<A: Clone> {
    /// Generation of the request this reply answers.
    pub generation: u64,
    pub result: Result<Vec<PopoverItem<A>>, String>,
}

/// Asynchronous lookup capability: given a query, produce candidate items.
///
/// `fetch` must not block the caller; implementations do their work on a
/// worker thread and send the reply, tagged with the supplied generation,
/// through `reply`.
pub trait ItemFetcher<A: Clone>: Send {
    fn fetch(&mut self, query: &str, generation: u64, reply: Sender<FetchReply<A>>);
}

/// Debounced remote source.
///
/// Each keystroke replaces the single pending deadline; when the deadline
/// elapses one fetch is issued. Replies from superseded requests are
/// dropped, so an older fetch resolving late can never overwrite a newer
/// view.
pub struct RemoteSource<A: Clone> {
    fetcher: Box<dyn ItemFetcher<A>>,
    head_items: Vec<PopoverItem<A>>,
    debounce: Duration,
    pending: Option<PendingQuery>,
    in_flight: bool,
    generation: u64,
    reply_tx: Sender<FetchReply<A>>,
    reply_rx: Receiver<FetchReply<A>>,
}

struct PendingQuery {
    query: String,
    deadline: Instant,
}

impl<A: Clone> RemoteSource<A> {
    pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

    pub fn new(fetcher: impl ItemFetcher<A> + 'static) -> Self {
        let (reply_tx, reply_rx) = channel();
        Self {
            fetcher: Box::new(fetcher),
            head_items: Vec::new(),
            debounce: Self::DEFAULT_DEBOUNCE,
            pending: None,
            in_flight: false,
            generation: 0,
            reply_tx,
            reply_rx,
        }
    }

    /// Static items prepended to every fetched result set (builder).
    pub fn with_head_items(mut self, items: Vec<PopoverItem<A>>) -> Self {
        self.head_items = items;
        self
    }

    /// Override the debounce window (builder).
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

impl<A: Clone> ItemSource<A> for RemoteSource<A> {
    fn query_changed(&mut self, query: &str, now: Instant) {
        // A newer keystroke cancels the earlier pending fetch cycle.
        self.pending = Some(PendingQuery {
            query: query.to_string(),
            deadline: now + self.debounce,
        });
    }

    fn poll(&mut self, now: Instant) -> Option<Vec<PopoverItem<A>>> {
        let due = matches!(&self.pending, Some(p) if p.deadline <= now);
        if due {
            if let Some(pending) = self.pending.take() {
                self.generation += 1;
                self.in_flight = true;
                self.fetcher
                    .fetch(&pending.query, self.generation, self.reply_tx.clone());
            }
        }

        // Drain replies; only the latest issued request may render.
        let mut fresh = None;
        while let Ok(reply) = self.reply_rx.try_recv() {
            if reply.generation != self.generation {
                debug!(
                    "Dropping stale item fetch (generation {})",
                    reply.generation
                );
                continue;
            }
            self.in_flight = false;
            match reply.result {
                Ok(items) => fresh = Some(items),
                Err(e) => warn!("Item fetch failed: {}", e),
            }
        }

        fresh.map(|items| {
            let mut view = self.head_items.clone();
            view.extend(items);
            view
        })
    }

    fn next_wakeup(&self, now: Instant) -> Option<Instant> {
        if let Some(pending) = &self.pending {
            Some(pending.deadline)
        } else if self.in_flight {
            Some(now + Duration::from_millis(50))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn item(label: &str) -> PopoverItem<u32> {
        PopoverItem::new(label, 0)
    }

    fn labels(view: &[PopoverItem<u32>]) -> Vec<&str> {
        view.iter().map(|i| i.label.as_str()).collect()
    }

    // ── Domain: Local filtering ──

    #[test]
    fn empty_query_yields_all_items_in_order() {
        let mut source = LocalSource::new(vec![item("Rename"), item("Copy"), item("Delete")]);
        let now = Instant::now();
        source.query_changed("", now);
        let view = source.poll(now).unwrap();
        assert_eq!(labels(&view), ["Rename", "Copy", "Delete"]);
    }

    #[test]
    fn query_filters_by_subsequence() {
        let mut source = LocalSource::new(vec![item("Rename"), item("Copy"), item("Delete")]);
        let now = Instant::now();
        source.query_changed("del", now);
        let view = source.poll(now).unwrap();
        assert_eq!(labels(&view), ["Delete"]);
    }

    #[test]
    fn unmatched_query_yields_empty_view() {
        let mut source = LocalSource::new(vec![item("Rename"), item("Copy")]);
        let now = Instant::now();
        source.query_changed("z", now);
        let view = source.poll(now).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn filter_always_runs_against_the_original_list() {
        let mut source = LocalSource::new(vec![item("Rename"), item("Copy"), item("Delete")]);
        let now = Instant::now();
        source.query_changed("del", now);
        assert_eq!(source.poll(now).unwrap().len(), 1);
        source.query_changed("", now);
        assert_eq!(source.poll(now).unwrap().len(), 3);
    }

    #[test]
    fn poll_without_query_change_yields_nothing() {
        let mut source = LocalSource::new(vec![item("Rename")]);
        assert!(source.poll(Instant::now()).is_none());
    }

    // ── Domain: Debounced remote lookup ──

    #[derive(Clone, Default)]
    struct RecordingFetcher {
        calls: Arc<Mutex<Vec<(String, u64, Sender<FetchReply<u32>>)>>>,
    }

    impl ItemFetcher<u32> for RecordingFetcher {
        fn fetch(&mut self, query: &str, generation: u64, reply: Sender<FetchReply<u32>>) {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), generation, reply));
        }
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn no_fetch_before_the_deadline() {
        let fetcher = RecordingFetcher::default();
        let calls = fetcher.calls.clone();
        let mut source = RemoteSource::new(fetcher);
        let t0 = Instant::now();

        source.query_changed("a", t0);
        assert!(source.poll(t0 + ms(100)).is_none());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn keystrokes_within_the_window_collapse_to_one_fetch() {
        let fetcher = RecordingFetcher::default();
        let calls = fetcher.calls.clone();
        let mut source = RemoteSource::new(fetcher);
        let t0 = Instant::now();

        source.query_changed("a", t0);
        source.query_changed("ab", t0 + ms(100));

        // The first deadline would have been t0+500; it was replaced.
        assert!(source.poll(t0 + ms(550)).is_none());
        assert!(calls.lock().unwrap().is_empty());

        source.poll(t0 + ms(650));
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "ab");
    }

    #[test]
    fn reply_replaces_view_with_head_items_prepended() {
        let fetcher = RecordingFetcher::default();
        let calls = fetcher.calls.clone();
        let mut source = RemoteSource::new(fetcher)
            .with_head_items(vec![item("Blank row"), item("Duplicate last row")]);
        let t0 = Instant::now();

        source.query_changed("wid", t0);
        source.poll(t0 + ms(600));
        let (query, generation, reply) = calls.lock().unwrap().remove(0);
        assert_eq!(query, "wid");

        reply
            .send(FetchReply {
                generation,
                result: Ok(vec![item("Widget")]),
            })
            .unwrap();

        let view = source.poll(t0 + ms(700)).unwrap();
        assert_eq!(labels(&view), ["Blank row", "Duplicate last row", "Widget"]);
    }

    #[test]
    fn stale_reply_is_dropped() {
        let fetcher = RecordingFetcher::default();
        let calls = fetcher.calls.clone();
        let mut source = RemoteSource::new(fetcher);
        let t0 = Instant::now();

        source.query_changed("a", t0);
        source.poll(t0 + ms(600));
        source.query_changed("ab", t0 + ms(700));
        source.poll(t0 + ms(1300));

        let (first, second) = {
            let mut calls = calls.lock().unwrap();
            assert_eq!(calls.len(), 2);
            let second = calls.remove(1);
            let first = calls.remove(0);
            (first, second)
        };

        first
            .2
            .send(FetchReply {
                generation: first.1,
                result: Ok(vec![item("Stale")]),
            })
            .unwrap();
        assert!(source.poll(t0 + ms(1400)).is_none());

        second
            .2
            .send(FetchReply {
                generation: second.1,
                result: Ok(vec![item("Fresh")]),
            })
            .unwrap();
        let view = source.poll(t0 + ms(1500)).unwrap();
        assert_eq!(labels(&view), ["Fresh"]);
    }

    #[test]
    fn fetch_failure_yields_no_view() {
        let fetcher = RecordingFetcher::default();
        let calls = fetcher.calls.clone();
        let mut source = RemoteSource::new(fetcher);
        let t0 = Instant::now();

        source.query_changed("a", t0);
        source.poll(t0 + ms(600));
        let (_, generation, reply) = calls.lock().unwrap().remove(0);

        reply
            .send(FetchReply {
                generation,
                result: Err("connection refused".to_string()),
            })
            .unwrap();
        assert!(source.poll(t0 + ms(700)).is_none());
    }

    #[test]
    fn custom_debounce_window_is_honored() {
        let fetcher = RecordingFetcher::default();
        let calls = fetcher.calls.clone();
        let mut source = RemoteSource::new(fetcher).with_debounce(ms(50));
        let t0 = Instant::now();

        source.query_changed("a", t0);
        source.poll(t0 + ms(60));
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn next_wakeup_reports_the_pending_deadline() {
        let fetcher = RecordingFetcher::default();
        let mut source = RemoteSource::new(fetcher);
        let t0 = Instant::now();

        assert!(source.next_wakeup(t0).is_none());
        source.query_changed("a", t0);
        assert_eq!(source.next_wakeup(t0), Some(t0 + ms(500)));
    }
}
