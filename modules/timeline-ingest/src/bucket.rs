use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use timeline_common::{Event, MonthBucket};

/// Chart date range: January 1 of the first event's year through the last
/// event's date. `None` for an empty list.
pub fn date_range(events: &[Event]) -> Option<(NaiveDate, NaiveDate)> {
    let first = events.iter().map(|e| e.date).min()?;
    let last = events.iter().map(|e| e.date).max()?;
    let start = NaiveDate::from_ymd_opt(first.year(), 1, 1)?;
    Some((start, last))
}

/// Group events into one bucket per calendar month from `start` through
/// `end`, months without events included. Columns are numbered from zero
/// without gaps; events keep their input order within a bucket.
pub fn bucket_by_month(events: &[Event], start: NaiveDate, end: NaiveDate) -> Vec<MonthBucket> {
    let mut by_month: BTreeMap<(i32, u32), Vec<Event>> = BTreeMap::new();
    for event in events {
        by_month.entry(event.year_month()).or_default().push(event.clone());
    }

    let mut buckets = Vec::new();
    let Some(mut cursor) = first_of_month(start.year(), start.month()) else {
        return buckets;
    };

    while cursor <= end {
        let (year, month) = (cursor.year(), cursor.month());
        buckets.push(MonthBucket {
            month: cursor,
            x: buckets.len(),
            events: by_month.remove(&(year, month)).unwrap_or_default(),
        });

        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        match first_of_month(next_year, next_month) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    buckets
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}
