use std::collections::{BTreeSet, HashMap};

use timeline_common::{
    slugify, CategoricalField, Event, FilterCatalog, FilterOption, IngestError, IngestResult,
};
use tracing::info;

/// Build the option catalog for every categorical field.
///
/// Options are the distinct non-empty values across all events, sorted and
/// numbered in sort order. Two names that slugify identically are an error.
pub fn build_catalog(events: &[Event]) -> IngestResult<FilterCatalog> {
    let mut catalog = FilterCatalog::default();
    for field in CategoricalField::ALL {
        let options = build_options(field, events)?;
        info!(field = %field, options = options.len(), "Built filter options");
        *catalog.options_mut(field) = options;
    }
    Ok(catalog)
}

fn build_options(field: CategoricalField, events: &[Event]) -> IngestResult<Vec<FilterOption>> {
    let names: BTreeSet<&str> = events
        .iter()
        .flat_map(|e| e.values(field))
        .map(String::as_str)
        .filter(|name| !name.is_empty())
        .collect();

    let mut seen: HashMap<String, &str> = HashMap::with_capacity(names.len());
    let mut options = Vec::with_capacity(names.len());

    for (id, name) in names.into_iter().enumerate() {
        let value = slugify(name);
        if let Some(first) = seen.insert(value.clone(), name) {
            return Err(IngestError::SlugCollision {
                field: field.to_string(),
                slug: value,
                first: first.to_string(),
                second: name.to_string(),
            });
        }
        options.push(FilterOption {
            name: name.to_string(),
            value,
            id: Some(id),
        });
    }

    Ok(options)
}
