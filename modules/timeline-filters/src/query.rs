//! Query-string codec for `SelectedFilters`.
//!
//! Keys are abbreviated (`c` for country, `from` for dateFrom, ...). List
//! values are joined with `|`, which never appears in taxonomy values, and
//! the whole string is form-urlencoded.

use std::collections::HashSet;

use timeline_common::{CategoricalField, FilterKind, SelectedFilters};
use tracing::debug;
use url::form_urlencoded;

pub const LIST_SEPARATOR: &str = "|";
pub const PAGE_PARAM: &str = "p";
pub const SORT_PARAM: &str = "o";

/// Query-string key of a filter kind.
pub fn param_key(kind: FilterKind) -> &'static str {
    match kind {
        FilterKind::Categorical(CategoricalField::Area) => "a",
        FilterKind::Categorical(CategoricalField::Campaign) => "cmp",
        FilterKind::Categorical(CategoricalField::Country) => "c",
        FilterKind::DateFrom => "from",
        FilterKind::DateTo => "to",
        FilterKind::Categorical(CategoricalField::Region) => "r",
        FilterKind::Search => "s",
        FilterKind::Categorical(CategoricalField::Target) => "t",
    }
}

/// Inverse of [`param_key`].
pub fn kind_for_param(key: &str) -> Option<FilterKind> {
    FilterKind::ALL.into_iter().find(|kind| param_key(*kind) == key)
}

/// Read filters from a query string (leading `?` optional).
///
/// Only values in the form [`encode_query`] writes are accepted: `o=1`, a
/// page of 2 or more without leading zeros, and lists without empty parts.
/// Anything else, like unknown keys, is skipped. When a key repeats, the
/// first occurrence wins.
pub fn decode_query(query: &str) -> SelectedFilters {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut filters = SelectedFilters::default();
    let mut seen = HashSet::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if !seen.insert(key.clone()) {
            continue;
        }

        if key == PAGE_PARAM {
            match parse_page(&value) {
                Some(page) => filters.page = Some(page),
                None => debug!(value = %value, "Ignoring malformed page parameter"),
            }
            continue;
        }

        if key == SORT_PARAM {
            match &*value {
                "1" => filters.sort = true,
                _ => debug!(value = %value, "Ignoring malformed sort parameter"),
            }
            continue;
        }

        match kind_for_param(&key) {
            Some(FilterKind::Categorical(field)) => match parse_list(&value) {
                Some(values) => *filters.values_mut(field) = values,
                None => debug!(key = %key, value = %value, "Ignoring malformed list parameter"),
            },
            Some(kind) => filters.set_text(kind, Some(value.into_owned())),
            None => debug!(key = %key, "Ignoring unknown query parameter"),
        }
    }

    filters
}

// Page 1 is the default and never written, so only later pages decode.
fn parse_page(value: &str) -> Option<u32> {
    let page = value.parse::<u32>().ok()?;
    (page >= 2 && page.to_string() == value).then_some(page)
}

fn parse_list(value: &str) -> Option<Vec<String>> {
    let parts: Vec<String> = value.split(LIST_SEPARATOR).map(str::to_string).collect();
    if parts.iter().any(String::is_empty) {
        return None;
    }
    Some(parts)
}

/// Canonical query string for `filters`: only non-empty fields, `p` only
/// past the first page, `o` only when sorting, keys sorted.
pub fn encode_query(filters: &SelectedFilters) -> String {
    let mut pairs: Vec<(&'static str, String)> = Vec::new();

    for kind in FilterKind::ALL {
        match kind {
            FilterKind::Categorical(field) => {
                let values: Vec<&str> = filters
                    .values(field)
                    .iter()
                    .map(String::as_str)
                    .filter(|v| !v.is_empty())
                    .collect();
                if !values.is_empty() {
                    pairs.push((param_key(kind), values.join(LIST_SEPARATOR)));
                }
            }
            FilterKind::DateFrom | FilterKind::DateTo | FilterKind::Search => {
                if let Some(text) = filters.text(kind) {
                    pairs.push((param_key(kind), text.to_string()));
                }
            }
        }
    }

    if filters.page() > 1 {
        pairs.push((PAGE_PARAM, filters.page().to_string()));
    }
    if filters.sort {
        pairs.push((SORT_PARAM, "1".to_string()));
    }

    serialize_sorted(pairs)
}

/// Re-serialize a query string with keys in stable sorted order, for
/// equality comparison.
pub fn canonicalize(query: &str) -> String {
    let query = query.strip_prefix('?').unwrap_or(query);
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    serialize_sorted(pairs)
}

fn serialize_sorted<K: AsRef<str> + Ord, V: AsRef<str>>(mut pairs: Vec<(K, V)>) -> String {
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_ref(), v.as_ref())))
        .finish()
}
