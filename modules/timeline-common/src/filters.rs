use serde::{Deserialize, Serialize};

// --- Filter Kinds ---

/// Multi-value tag fields matched by set intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    Area,
    Campaign,
    Country,
    Region,
    Target,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 5] = [
        CategoricalField::Area,
        CategoricalField::Campaign,
        CategoricalField::Country,
        CategoricalField::Region,
        CategoricalField::Target,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoricalField::Area => "area",
            CategoricalField::Campaign => "campaign",
            CategoricalField::Country => "country",
            CategoricalField::Region => "region",
            CategoricalField::Target => "target",
        }
    }
}

impl std::fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every dimension a query can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Categorical(CategoricalField),
    DateFrom,
    DateTo,
    Search,
}

impl FilterKind {
    pub const ALL: [FilterKind; 8] = [
        FilterKind::Categorical(CategoricalField::Area),
        FilterKind::Categorical(CategoricalField::Campaign),
        FilterKind::Categorical(CategoricalField::Country),
        FilterKind::DateFrom,
        FilterKind::DateTo,
        FilterKind::Categorical(CategoricalField::Region),
        FilterKind::Search,
        FilterKind::Categorical(CategoricalField::Target),
    ];
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterKind::Categorical(field) => write!(f, "{field}"),
            FilterKind::DateFrom => write!(f, "dateFrom"),
            FilterKind::DateTo => write!(f, "dateTo"),
            FilterKind::Search => write!(f, "search"),
        }
    }
}

// --- Selected Filters ---

/// Query state held by the presentation layer.
///
/// Empty lists and `None` mean "not constrained". `page` and `sort` travel
/// with the query string but never restrict which events match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFilters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub area: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub campaign: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub country: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub region: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default)]
    pub sort: bool,
}

impl SelectedFilters {
    pub fn values(&self, field: CategoricalField) -> &[String] {
        match field {
            CategoricalField::Area => &self.area,
            CategoricalField::Campaign => &self.campaign,
            CategoricalField::Country => &self.country,
            CategoricalField::Region => &self.region,
            CategoricalField::Target => &self.target,
        }
    }

    pub fn values_mut(&mut self, field: CategoricalField) -> &mut Vec<String> {
        match field {
            CategoricalField::Area => &mut self.area,
            CategoricalField::Campaign => &mut self.campaign,
            CategoricalField::Country => &mut self.country,
            CategoricalField::Region => &mut self.region,
            CategoricalField::Target => &mut self.target,
        }
    }

    /// Text of a string-valued kind, `None` when unset or empty.
    /// Categorical kinds always return `None`.
    pub fn text(&self, kind: FilterKind) -> Option<&str> {
        let value = match kind {
            FilterKind::DateFrom => self.date_from.as_deref(),
            FilterKind::DateTo => self.date_to.as_deref(),
            FilterKind::Search => self.search.as_deref(),
            FilterKind::Categorical(_) => None,
        };
        value.filter(|v| !v.is_empty())
    }

    pub fn set_text(&mut self, kind: FilterKind, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        match kind {
            FilterKind::DateFrom => self.date_from = value,
            FilterKind::DateTo => self.date_to = value,
            FilterKind::Search => self.search = value,
            FilterKind::Categorical(field) => {
                *self.values_mut(field) = value.into_iter().collect();
            }
        }
    }

    /// Whether `kind` carries a non-empty value.
    pub fn is_active(&self, kind: FilterKind) -> bool {
        match kind {
            FilterKind::Categorical(field) => !self.values(field).is_empty(),
            FilterKind::DateFrom | FilterKind::DateTo | FilterKind::Search => {
                self.text(kind).is_some()
            }
        }
    }

    /// Kinds with a non-empty value, in canonical order.
    pub fn active_kinds(&self) -> Vec<FilterKind> {
        FilterKind::ALL
            .into_iter()
            .filter(|kind| self.is_active(*kind))
            .collect()
    }

    /// True when no field restricts the event list.
    pub fn is_unconstrained(&self) -> bool {
        !FilterKind::ALL.iter().any(|kind| self.is_active(*kind))
    }

    /// Current page, 1-based.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unconstrained() {
        let filters = SelectedFilters::default();
        assert!(filters.is_unconstrained());
        assert!(filters.active_kinds().is_empty());
        assert_eq!(filters.page(), 1);
    }

    #[test]
    fn test_page_and_sort_do_not_constrain() {
        let filters = SelectedFilters {
            page: Some(3),
            sort: true,
            ..Default::default()
        };
        assert!(filters.is_unconstrained());
    }

    #[test]
    fn test_empty_text_is_inactive() {
        let mut filters = SelectedFilters::default();
        filters.set_text(FilterKind::Search, Some(String::new()));
        assert_eq!(filters.search, None);

        filters.set_text(FilterKind::DateFrom, Some("2020-01-01".into()));
        assert_eq!(filters.active_kinds(), vec![FilterKind::DateFrom]);
    }

    #[test]
    fn test_active_kinds_follow_canonical_order() {
        let filters = SelectedFilters {
            target: vec!["HP".into()],
            country: vec!["Canada".into()],
            search: Some("vote".into()),
            ..Default::default()
        };
        assert_eq!(
            filters.active_kinds(),
            vec![
                FilterKind::Categorical(CategoricalField::Country),
                FilterKind::Search,
                FilterKind::Categorical(CategoricalField::Target),
            ]
        );
    }

    #[test]
    fn test_serializes_camel_case_and_skips_empty() {
        let filters = SelectedFilters {
            date_from: Some("2020-01-01".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(json, serde_json::json!({ "dateFrom": "2020-01-01", "sort": false }));
    }
}
