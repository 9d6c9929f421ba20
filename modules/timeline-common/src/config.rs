use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Google Sheets CSV export; `{id}` is replaced with the spreadsheet id.
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://docs.google.com/spreadsheets/d/{id}/gviz/tq?tqx=out:csv";
pub const DEFAULT_DATE_PATTERN: &str = r"^[0-9]{4}-[0-1][0-9]-[0-3][0-9]$";
pub const DEFAULT_ID_WIDTH: usize = 15;

/// Shape of the tabular source: where to fetch it and which header holds
/// which field. Loaded from TOML or taken from `Default`, which matches the
/// campaign spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceLayout {
    pub url_template: String,
    pub date_pattern: String,
    /// Zero-padded width of generated ids, used when `columns.id` is unset.
    pub id_width: usize,
    pub columns: ColumnNames,
}

/// Header text of each source column. Matched after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnNames {
    /// Identifier column. `None` (or `id = ""` in TOML) assigns sequential
    /// ids instead.
    pub id: Option<String>,
    pub date: String,
    pub area: String,
    pub campaign: String,
    pub headline: String,
    pub summary: String,
    pub city: String,
    pub country: String,
    pub region: String,
    pub target: String,
    pub source: String,
    /// Additional citation columns; absent headers are skipped.
    pub coverage: Vec<String>,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            date_pattern: DEFAULT_DATE_PATTERN.to_string(),
            id_width: DEFAULT_ID_WIDTH,
            columns: ColumnNames::default(),
        }
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            id: Some("ID".to_string()),
            date: "Date \nYYYY-MM-DD".to_string(),
            area: "Categorize\n(leave empty if not applicable) Campaign Area".to_string(),
            campaign: "Campaign".to_string(),
            headline: "Headline".to_string(),
            summary: "Summary".to_string(),
            city: "Location/Site where Action Taken\n(leave empty if not applicable) City "
                .to_string(),
            country: "Country".to_string(),
            region: "Region ↗".to_string(),
            target: "Target".to_string(),
            source: "Sources and Media Coverage\n(source required, coverage optional) Source"
                .to_string(),
            coverage: vec![
                "Coverage 1".to_string(),
                "Coverage 2".to_string(),
                "Coverage 3".to_string(),
            ],
        }
    }
}

impl SourceLayout {
    /// Fetch URL for a source identifier.
    pub fn source_url(&self, source_id: &str) -> String {
        self.url_template.replace("{id}", source_id)
    }
}

impl ColumnNames {
    /// Columns every row must carry a header for.
    pub fn required(&self) -> Vec<&str> {
        let mut names = vec![
            self.date.as_str(),
            self.area.as_str(),
            self.campaign.as_str(),
            self.headline.as_str(),
            self.summary.as_str(),
            self.city.as_str(),
            self.country.as_str(),
            self.region.as_str(),
            self.target.as_str(),
            self.source.as_str(),
        ];
        if let Some(id) = self.id_column() {
            names.insert(0, id);
        }
        names
    }

    pub fn id_column(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }

    /// Source column followed by coverage columns, in citation order.
    pub fn citations(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.source.as_str()).chain(self.coverage.iter().map(String::as_str))
    }
}

/// Load a layout from a TOML file. Missing keys fall back to the defaults.
pub fn load_layout(path: &Path) -> Result<SourceLayout> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read layout file: {}", path.display()))?;
    let layout: SourceLayout = toml::from_str(&content)
        .with_context(|| format!("Failed to parse layout file: {}", path.display()))?;
    tracing::info!(path = %path.display(), "Loaded source layout");
    Ok(layout)
}
