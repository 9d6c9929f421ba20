//! Ingestion pipeline for the campaign timeline.
//!
//! Fetches the source sheet, normalizes each row into an `Event`, then
//! derives the filter catalog and the month-bucketed chart layout. The three
//! results are written together or not at all.

pub mod artifacts;
pub mod bucket;
pub mod catalog;
pub mod domain;
pub mod ingester;
pub mod integrity;
pub mod layout;
pub mod pipeline;
pub mod source;

pub use artifacts::Artifacts;
pub use bucket::{bucket_by_month, date_range};
pub use catalog::build_catalog;
pub use domain::extract_domain;
pub use ingester::RecordIngester;
pub use integrity::{verify_references, StoryIndex, StoryRef};
pub use layout::{layout_chart, MAJOR_TICK_INTERVAL};
pub use pipeline::run;
pub use source::{parse_rows, SheetSource, SourceRow, TabularSource};
