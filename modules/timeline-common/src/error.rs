use thiserror::Error;

/// Failures of the ingestion run. Every variant aborts the run before any
/// artifact is written.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Unable to fetch source data from {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Unable to parse source data: {0}")]
    Parse(String),

    #[error("Row {row}: {column} {message}\n\n{contents}")]
    Validation {
        /// 1-based data row, header excluded.
        row: usize,
        column: String,
        message: String,
        contents: String,
    },

    #[error("Slug collision in {field} options: {first:?} and {second:?} both map to {slug:?}")]
    SlugCollision {
        field: String,
        slug: String,
        first: String,
        second: String,
    },

    #[error("Story {story:?} references unknown events: {}", .missing.join(", "))]
    ReferentialIntegrity { story: String, missing: Vec<String> },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for ingestion operations.
pub type IngestResult<T> = std::result::Result<T, IngestError>;
