pub mod types;
pub mod filters;
pub mod slug;
pub mod config;
pub mod error;

pub use types::*;
pub use filters::*;
pub use slug::slugify;
pub use config::{load_layout, ColumnNames, SourceLayout};
pub use error::{IngestError, IngestResult};
