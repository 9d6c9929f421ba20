use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::filters::CategoricalField;

// --- Event Types ---

/// A citation attached to an event, with the bare domain pulled from its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSource {
    pub url: String,
    pub domain: String,
}

/// One normalized row of the source sheet.
///
/// Categorical fields hold de-duplicated values in first-seen order. `x`/`y`
/// stay at zero until the chart layout assigns a grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub date: NaiveDate,
    pub area: Vec<String>,
    pub campaign: Vec<String>,
    pub headline: String,
    pub summary: String,
    pub city: String,
    pub country: Vec<String>,
    pub region: Vec<String>,
    pub target: Vec<String>,
    pub sources: Vec<EventSource>,
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
}

impl Event {
    /// Values of one categorical field.
    pub fn values(&self, field: CategoricalField) -> &[String] {
        match field {
            CategoricalField::Area => &self.area,
            CategoricalField::Campaign => &self.campaign,
            CategoricalField::Country => &self.country,
            CategoricalField::Region => &self.region,
            CategoricalField::Target => &self.target,
        }
    }

    /// `(year, month)` key used for monthly bucketing.
    pub fn year_month(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }
}

// --- Catalog Types ---

/// A selectable value of a categorical filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub name: String,
    /// URL-safe slug of `name`, unique within its field.
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<usize>,
}

/// Filter options for every categorical field, each sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCatalog {
    pub area: Vec<FilterOption>,
    pub campaign: Vec<FilterOption>,
    pub country: Vec<FilterOption>,
    pub region: Vec<FilterOption>,
    pub target: Vec<FilterOption>,
}

impl FilterCatalog {
    pub fn options(&self, field: CategoricalField) -> &[FilterOption] {
        match field {
            CategoricalField::Area => &self.area,
            CategoricalField::Campaign => &self.campaign,
            CategoricalField::Country => &self.country,
            CategoricalField::Region => &self.region,
            CategoricalField::Target => &self.target,
        }
    }

    pub fn options_mut(&mut self, field: CategoricalField) -> &mut Vec<FilterOption> {
        match field {
            CategoricalField::Area => &mut self.area,
            CategoricalField::Campaign => &mut self.campaign,
            CategoricalField::Country => &mut self.country,
            CategoricalField::Region => &mut self.region,
            CategoricalField::Target => &mut self.target,
        }
    }
}

// --- Chart Types ---

/// All events of one calendar month, placed in chart column `x`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    /// First day of the month.
    pub month: NaiveDate,
    pub x: usize,
    pub events: Vec<Event>,
}

impl MonthBucket {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Year marker on the time axis, placed at a January column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub label: i32,
    pub x: usize,
    pub major: bool,
}

/// Grid cell of a single event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPoint {
    pub id: String,
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub columns: usize,
    pub rows: usize,
    pub ticks: Vec<Tick>,
    pub data: Vec<GridPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> Event {
        Event {
            id: "000000000000001".into(),
            date: NaiveDate::from_ymd_opt(2021, 3, 14).unwrap(),
            area: vec!["Economic Boycott".into()],
            campaign: vec![],
            headline: "Council votes".into(),
            summary: String::new(),
            city: "Oslo".into(),
            country: vec!["Norway".into()],
            region: vec!["Europe".into()],
            target: vec![],
            sources: vec![],
            x: 0,
            y: 0,
        }
    }

    #[test]
    fn test_event_date_serializes_as_iso_day() {
        let json = serde_json::to_value(event()).unwrap();
        assert_eq!(json["date"], "2021-03-14");
        assert_eq!(json["country"][0], "Norway");
    }

    #[test]
    fn test_event_values_by_field() {
        let e = event();
        assert_eq!(e.values(CategoricalField::Region), ["Europe".to_string()]);
        assert!(e.values(CategoricalField::Target).is_empty());
        assert_eq!(e.year_month(), (2021, 3));
    }

    #[test]
    fn test_option_id_omitted_when_absent() {
        let option = FilterOption {
            name: "Canada".into(),
            value: "canada".into(),
            id: None,
        };
        let json = serde_json::to_string(&option).unwrap();
        assert_eq!(json, r#"{"name":"Canada","value":"canada"}"#);
    }
}
