use std::sync::Arc;

use async_trait::async_trait;
use timeline_common::{IngestError, IngestResult};
use tracing::info;

/// A provider of raw delimited text with a header row.
#[async_trait]
pub trait TabularSource: Send + Sync {
    /// Fetch the whole table as text.
    async fn fetch(&self) -> IngestResult<String>;

    /// Where the data comes from (for logging/errors).
    fn describe(&self) -> &str;
}

/// CSV export of a spreadsheet fetched over HTTP.
pub struct SheetSource {
    client: reqwest::Client,
    url: String,
}

impl SheetSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl TabularSource for SheetSource {
    async fn fetch(&self) -> IngestResult<String> {
        info!(url = %self.url, "Fetching source sheet");

        let fetch_err = |reason: String| IngestError::Fetch {
            url: self.url.clone(),
            reason,
        };

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP {status}")));
        }

        let body = response.text().await.map_err(|e| fetch_err(e.to_string()))?;
        info!(url = %self.url, bytes = body.len(), "Fetched source sheet");
        Ok(body)
    }

    fn describe(&self) -> &str {
        &self.url
    }
}

// --- Rows ---

/// One data row, addressable by (trimmed) header text.
#[derive(Debug, Clone)]
pub struct SourceRow {
    /// 1-based position among data rows.
    pub number: usize,
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl SourceRow {
    pub fn new(number: usize, headers: Arc<[String]>, values: Vec<String>) -> Self {
        Self {
            number,
            headers,
            values,
        }
    }

    /// Cell under `column`, `None` when the header is absent.
    pub fn get(&self, column: &str) -> Option<&str> {
        let column = column.trim();
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    /// Cell under `column`, empty when absent.
    pub fn cell(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    /// `header: value` lines for error reports.
    pub fn contents(&self) -> String {
        self.headers
            .iter()
            .zip(&self.values)
            .map(|(h, v)| {
                let header = h.split_whitespace().collect::<Vec<_>>().join(" ");
                format!("  {header}: {v}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parse CSV text with a header row. Fields and headers are trimmed and
/// blank lines skipped.
pub fn parse_rows(text: &str) -> IngestResult<(Arc<[String]>, Vec<SourceRow>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Arc<[String]> = reader
        .headers()
        .map_err(|e| IngestError::Parse(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| IngestError::Parse(e.to_string()))?;
        let values = record.iter().map(str::to_string).collect();
        rows.push(SourceRow::new(i + 1, headers.clone(), values));
    }

    Ok((headers, rows))
}
