use chrono::NaiveDate;
use regex::Regex;
use timeline_common::{Event, EventSource, IngestError, IngestResult, SourceLayout};
use tracing::{debug, info};

use crate::domain::extract_domain;
use crate::source::{parse_rows, SourceRow, TabularSource};

/// Turns source rows into sorted, validated events.
///
/// Validation is all-or-nothing: the first bad row fails the whole batch.
pub struct RecordIngester {
    layout: SourceLayout,
    date_re: Regex,
}

impl RecordIngester {
    pub fn new(layout: SourceLayout) -> IngestResult<Self> {
        let date_re = Regex::new(&layout.date_pattern).map_err(|e| {
            IngestError::Config(format!("invalid date pattern {:?}: {e}", layout.date_pattern))
        })?;
        Ok(Self { layout, date_re })
    }

    pub fn layout(&self) -> &SourceLayout {
        &self.layout
    }

    /// Fetch, parse and normalize the whole source.
    pub async fn ingest(&self, source: &dyn TabularSource) -> IngestResult<Vec<Event>> {
        let text = source.fetch().await?;
        let events = self.ingest_text(&text)?;
        info!(source = source.describe(), events = events.len(), "Ingested events");
        Ok(events)
    }

    /// Parse and normalize CSV text.
    pub fn ingest_text(&self, text: &str) -> IngestResult<Vec<Event>> {
        let (headers, rows) = parse_rows(text)?;

        for column in self.layout.columns.required() {
            if !headers.iter().any(|h| h == column.trim()) {
                return Err(IngestError::Parse(format!(
                    "missing column {:?}",
                    column.trim()
                )));
            }
        }

        self.normalize(&rows)
    }

    /// Validate every row and build events sorted by date. Rows sharing a
    /// date keep their source order.
    pub fn normalize(&self, rows: &[SourceRow]) -> IngestResult<Vec<Event>> {
        let mut events = rows
            .iter()
            .map(|row| self.to_event(row))
            .collect::<IngestResult<Vec<_>>>()?;

        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    fn to_event(&self, row: &SourceRow) -> IngestResult<Event> {
        let columns = &self.layout.columns;
        let date = self.validate_date(row)?;

        let id = match columns.id_column() {
            Some(column) => {
                let id = row.cell(column);
                if id.is_empty() {
                    return Err(invalid(row, column, "is missing"));
                }
                id.to_string()
            }
            None => format!("{:0width$}", row.number, width = self.layout.id_width),
        };

        let sources: Vec<EventSource> = columns
            .citations()
            .filter_map(|column| row.get(column))
            .filter(|url| !url.is_empty())
            .map(|url| EventSource {
                url: url.to_string(),
                domain: extract_domain(url),
            })
            .collect();

        debug!(row = row.number, id = %id, sources = sources.len(), "Normalized row");

        Ok(Event {
            id,
            date,
            area: split_list(row.cell(&columns.area)),
            campaign: split_list(row.cell(&columns.campaign)),
            headline: row.cell(&columns.headline).to_string(),
            summary: row.cell(&columns.summary).to_string(),
            city: row.cell(&columns.city).to_string(),
            country: split_list(row.cell(&columns.country)),
            region: split_list(row.cell(&columns.region)),
            target: split_list(row.cell(&columns.target)),
            sources,
            x: 0,
            y: 0,
        })
    }

    fn validate_date(&self, row: &SourceRow) -> IngestResult<NaiveDate> {
        let column = &self.layout.columns.date;
        let raw = row.cell(column);
        if raw.is_empty() {
            return Err(invalid(row, column, "is missing"));
        }
        if !self.date_re.is_match(raw) {
            return Err(invalid(row, column, &format!("is invalid: {raw:?}")));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| invalid(row, column, &format!("is not a calendar date: {raw:?}")))
    }
}

fn invalid(row: &SourceRow, column: &str, message: &str) -> IngestError {
    IngestError::Validation {
        row: row.number,
        column: column.split_whitespace().collect::<Vec<_>>().join(" "),
        message: message.to_string(),
        contents: row.contents(),
    }
}

/// Split a comma-separated cell into trimmed, non-empty, distinct values.
fn split_list(cell: &str) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for value in cell.split(',').map(str::trim).filter(|v| !v.is_empty()) {
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values
}
