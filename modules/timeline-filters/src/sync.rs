use std::time::Duration;

use timeline_common::SelectedFilters;
use tokio::time::Instant;
use tracing::debug;

use crate::query::{canonicalize, decode_query, encode_query};

/// Quiet period before a requested URL write runs.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(250);

/// The address bar and its navigation history.
pub trait History {
    /// Query string of the current entry, without the leading `?`.
    fn current_query(&self) -> String;

    /// Add an entry with `query` and make it current, without reloading.
    fn push(&mut self, query: &str);
}

/// Browser-like history kept in memory. `back`/`forward` move the cursor
/// the way navigation buttons do; a push drops any forward entries.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn new(initial_query: impl Into<String>) -> Self {
        Self {
            entries: vec![initial_query.into()],
            cursor: 0,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Step back one entry. Returns false at the oldest entry.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one entry. Returns false at the newest entry.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("")
    }
}

impl History for MemoryHistory {
    fn current_query(&self) -> String {
        self.entries[self.cursor].clone()
    }

    fn push(&mut self, query: &str) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(query.to_string());
        self.cursor = self.entries.len() - 1;
    }
}

/// What a URL write did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A new history entry was pushed with this query.
    Pushed(String),
    /// The address bar already showed this state.
    Unchanged,
}

struct PendingEncode {
    due: Instant,
    filters: SelectedFilters,
}

/// Keeps `SelectedFilters` and the address bar in step.
///
/// Writes are debounced: each request replaces the pending one and restarts
/// the quiet window, so a burst of changes produces one write. Reads happen
/// on load and on back/forward navigation.
pub struct UrlStateSync<H: History> {
    history: H,
    window: Duration,
    pending: Option<PendingEncode>,
}

impl<H: History> UrlStateSync<H> {
    pub fn new(history: H) -> Self {
        Self::with_window(history, DEBOUNCE_WINDOW)
    }

    pub fn with_window(history: H, window: Duration) -> Self {
        Self {
            history,
            window,
            pending: None,
        }
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Filters described by the current address bar (initial load).
    pub fn decode_current(&self) -> SelectedFilters {
        decode_query(&self.history.current_query())
    }

    /// Back/forward navigation happened: drop any pending write and return
    /// the state the new entry describes.
    pub fn on_navigation(&mut self) -> SelectedFilters {
        if self.pending.take().is_some() {
            debug!("Navigation cancelled pending URL write");
        }
        self.decode_current()
    }

    /// Schedule a URL write for `filters`, replacing any pending one.
    pub fn request_encode(&mut self, filters: SelectedFilters) {
        self.request_encode_at(filters, Instant::now());
    }

    pub fn request_encode_at(&mut self, filters: SelectedFilters, now: Instant) {
        if self.pending.is_some() {
            debug!("Replacing pending URL write");
        }
        self.pending = Some(PendingEncode {
            due: now + self.window,
            filters,
        });
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending write becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Run the pending write if its window has elapsed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<SyncOutcome> {
        let due = self.deadline()?;
        if due > now {
            return None;
        }
        let pending = self.pending.take()?;
        Some(self.apply(&pending.filters))
    }

    /// Wait for the pending write's window to elapse, then run it.
    pub async fn flush(&mut self) -> Option<SyncOutcome> {
        let due = self.deadline()?;
        tokio::time::sleep_until(due).await;
        self.poll(due)
    }

    /// Write `filters` to the address bar now, pushing an entry only when
    /// the canonical query differs from the current one.
    pub fn apply(&mut self, filters: &SelectedFilters) -> SyncOutcome {
        let next = encode_query(filters);
        let current = canonicalize(&self.history.current_query());
        if next == current {
            return SyncOutcome::Unchanged;
        }
        debug!(query = %next, "Pushing history entry");
        self.history.push(&next);
        SyncOutcome::Pushed(next)
    }
}
