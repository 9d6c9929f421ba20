use chrono::NaiveDate;
use timeline_common::{CategoricalField, Event, FilterKind, SelectedFilters};

/// Event text the free-text search looks in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    Headline,
    Summary,
    /// Every value of the event's target field.
    Target,
}

pub const SEARCH_TARGETS: [SearchTarget; 3] =
    [SearchTarget::Headline, SearchTarget::Summary, SearchTarget::Target];

/// One active constraint, prepared once per query.
enum Criterion<'a> {
    AnyOf(CategoricalField, &'a [String]),
    OnOrAfter(NaiveDate),
    OnOrBefore(NaiveDate),
    Contains(String),
}

impl Criterion<'_> {
    fn matches(&self, event: &Event) -> bool {
        match self {
            Criterion::AnyOf(field, selected) => {
                event.values(*field).iter().any(|v| selected.contains(v))
            }
            Criterion::OnOrAfter(from) => event.date >= *from,
            Criterion::OnOrBefore(to) => event.date <= *to,
            Criterion::Contains(needle) => SEARCH_TARGETS.iter().any(|target| match target {
                SearchTarget::Headline => contains_folded(&event.headline, needle),
                SearchTarget::Summary => contains_folded(&event.summary, needle),
                SearchTarget::Target => event.target.iter().any(|t| contains_folded(t, needle)),
            }),
        }
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn criteria(filters: &SelectedFilters) -> Vec<Criterion<'_>> {
    filters
        .active_kinds()
        .into_iter()
        .filter_map(|kind| match kind {
            FilterKind::Categorical(field) => Some(Criterion::AnyOf(field, filters.values(field))),
            FilterKind::DateFrom => filters.text(kind).and_then(parse_day).map(Criterion::OnOrAfter),
            FilterKind::DateTo => filters.text(kind).and_then(parse_day).map(Criterion::OnOrBefore),
            FilterKind::Search => filters
                .text(kind)
                .map(|q| Criterion::Contains(q.to_lowercase())),
        })
        .collect()
}

// Malformed bounds drop out of the query instead of excluding everything.
fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn matches_all(event: &Event, criteria: &[Criterion<'_>]) -> bool {
    let expected = criteria.len();
    let matched = criteria.iter().filter(|c| c.matches(event)).count();
    matched == expected
}

/// Whether a single event satisfies every active field of `filters`.
pub fn event_matches(event: &Event, filters: &SelectedFilters) -> bool {
    matches_all(event, &criteria(filters))
}

/// Events matching `filters`, in input order.
///
/// Fields combine with AND; values within a categorical field combine with
/// OR. A query with no active field returns every event.
pub fn matching<'a>(events: &'a [Event], filters: &SelectedFilters) -> Vec<&'a Event> {
    if filters.is_unconstrained() {
        return events.iter().collect();
    }
    let criteria = criteria(filters);
    events.iter().filter(|e| matches_all(e, &criteria)).collect()
}

/// Owned variant of [`matching`].
pub fn filter_events(events: &[Event], filters: &SelectedFilters) -> Vec<Event> {
    if filters.is_unconstrained() {
        return events.to_vec();
    }
    matching(events, filters).into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, date: &str, country: &[&str], headline: &str) -> Event {
        Event {
            id: id.into(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            area: vec![],
            campaign: vec![],
            headline: headline.into(),
            summary: String::new(),
            city: String::new(),
            country: country.iter().map(|c| c.to_string()).collect(),
            region: vec![],
            target: vec![],
            sources: vec![],
            x: 0,
            y: 0,
        }
    }

    fn events() -> Vec<Event> {
        vec![
            event("1", "2019-06-01", &["Canada"], "Union backs boycott"),
            event("2", "2020-02-10", &["Canada", "Mexico"], "City COUNCIL votes"),
            event("3", "2020-05-05", &["Chile"], "Students occupy hall"),
            event("4", "2021-01-01", &["Canada"], "Pension fund divests"),
        ]
    }

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filters_return_everything_in_order() {
        let all = events();
        let result = filter_events(&all, &SelectedFilters::default());
        assert_eq!(result, all);
    }

    #[test]
    fn test_page_only_is_identity() {
        let all = events();
        let filters = SelectedFilters {
            page: Some(4),
            sort: true,
            ..Default::default()
        };
        assert_eq!(matching(&all, &filters).len(), 4);
    }

    #[test]
    fn test_country_and_date_from() {
        let filters = SelectedFilters {
            country: vec!["Canada".into()],
            date_from: Some("2020-01-01".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events(), &filters)), ["2", "4"]);
    }

    #[test]
    fn test_categorical_is_or_within_field() {
        let filters = SelectedFilters {
            country: vec!["Mexico".into(), "Chile".into()],
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events(), &filters)), ["2", "3"]);
    }

    #[test]
    fn test_date_bounds_inclusive() {
        let filters = SelectedFilters {
            date_from: Some("2020-02-10".into()),
            date_to: Some("2020-05-05".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events(), &filters)), ["2", "3"]);
    }

    #[test]
    fn test_search_ignores_case() {
        let filters = SelectedFilters {
            search: Some("council".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events(), &filters)), ["2"]);

        let filters = SelectedFilters {
            search: Some("PENSION".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events(), &filters)), ["4"]);
    }

    #[test]
    fn test_search_covers_summary_and_target() {
        let mut all = events();
        all[0].summary = "Motion passed by the General Assembly".into();
        all[2].target = vec!["Elbit Systems".into()];

        let by_summary = SelectedFilters {
            search: Some("general assembly".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&all, &by_summary)), ["1"]);

        let by_target = SelectedFilters {
            search: Some("elbit".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&all, &by_target)), ["3"]);
    }

    #[test]
    fn test_malformed_date_bound_is_ignored() {
        let filters = SelectedFilters {
            date_from: Some("last year".into()),
            country: vec!["Chile".into()],
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(&events(), &filters)), ["3"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let filters = SelectedFilters {
            country: vec!["Chile".into()],
            date_from: Some("2021-01-01".into()),
            ..Default::default()
        };
        assert!(filter_events(&events(), &filters).is_empty());
        assert!(!event_matches(&events()[2], &filters));
    }
}
