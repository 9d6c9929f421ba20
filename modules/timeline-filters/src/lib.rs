//! Presentation-side filtering and address-bar synchronization.
//!
//! Everything here runs in a single UI context: matching is synchronous, and
//! the only deferred work is the debounced query-string write owned by
//! `UrlStateSync`.

pub mod engine;
pub mod names;
pub mod query;
pub mod sync;

pub use engine::{event_matches, filter_events, matching, SearchTarget, SEARCH_TARGETS};
pub use names::{option_names, resolve_names};
pub use query::{canonicalize, decode_query, encode_query, kind_for_param, param_key};
pub use sync::{History, MemoryHistory, SyncOutcome, UrlStateSync, DEBOUNCE_WINDOW};
