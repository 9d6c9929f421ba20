//! The URL carries option slugs (`united-kingdom`), events carry display
//! names (`United Kingdom`). These helpers translate between them.

use timeline_common::{CategoricalField, FilterCatalog, FilterOption, SelectedFilters};

/// Display names of the options whose slug is in `values`, in catalog order.
/// Unknown slugs are dropped.
pub fn option_names(values: &[String], options: &[FilterOption]) -> Vec<String> {
    options
        .iter()
        .filter(|o| values.contains(&o.value))
        .map(|o| o.name.clone())
        .collect()
}

/// Copy of `filters` with every categorical selection turned from slugs into
/// display names, ready for matching against events.
pub fn resolve_names(filters: &SelectedFilters, catalog: &FilterCatalog) -> SelectedFilters {
    let mut resolved = filters.clone();
    for field in CategoricalField::ALL {
        let names = option_names(filters.values(field), catalog.options(field));
        *resolved.values_mut(field) = names;
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(name: &str, value: &str) -> FilterOption {
        FilterOption {
            name: name.into(),
            value: value.into(),
            id: None,
        }
    }

    #[test]
    fn test_option_names_in_catalog_order() {
        let options = vec![
            option("Canada", "canada"),
            option("United Kingdom", "united-kingdom"),
            option("United States", "united-states"),
        ];
        let values = vec!["united-states".to_string(), "canada".to_string(), "atlantis".to_string()];
        assert_eq!(option_names(&values, &options), ["Canada", "United States"]);
    }

    #[test]
    fn test_resolve_names_keeps_other_fields() {
        let mut catalog = FilterCatalog::default();
        catalog.target = vec![option("HP", "hp"), option("Puma", "puma")];

        let filters = SelectedFilters {
            target: vec!["puma".into()],
            search: Some("boycott".into()),
            page: Some(2),
            ..Default::default()
        };
        let resolved = resolve_names(&filters, &catalog);
        assert_eq!(resolved.target, ["Puma"]);
        assert_eq!(resolved.search.as_deref(), Some("boycott"));
        assert_eq!(resolved.page, Some(2));
        assert!(resolved.country.is_empty());
    }
}
