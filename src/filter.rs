use serde::Serialize;
use tracing::{debug, warn};

use crate::types::{distinct_in_order, Dataset, Selection};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FilterStatus {
    /// "All" was selected; rows pass through unchanged.
    AllRegions,
    Applied { region: String },
    /// The category column is absent; rows pass through unfiltered.
    Unavailable { column: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub dataset: Dataset,
    pub status: FilterStatus,
}

/// Selectable values of `column` in first-seen order, `None` when it is absent.
///
/// The "all" choice is not included; the presentation layer prepends it.
pub fn region_choices(dataset: &Dataset, column: &str) -> Option<Vec<String>> {
    Some(distinct_in_order(dataset.column_values(column)?))
}

pub fn filter_by_region(dataset: &Dataset, column: &str, selection: &Selection) -> FilterOutcome {
    let Some(idx) = dataset.column_index(column) else {
        warn!(column, "category column not found, showing unfiltered data");
        return FilterOutcome {
            dataset: dataset.clone(),
            status: FilterStatus::Unavailable {
                column: column.to_string(),
            },
        };
    };
    match selection {
        Selection::All => FilterOutcome {
            dataset: dataset.clone(),
            status: FilterStatus::AllRegions,
        },
        Selection::Region(region) => {
            let filtered =
                dataset.select_rows(|row| row[idx].as_text().is_some_and(|v| v == *region));
            debug!(region = %region, rows = filtered.len(), "applied region filter");
            FilterOutcome {
                dataset: filtered,
                status: FilterStatus::Applied {
                    region: region.clone(),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;
    use pretty_assertions::assert_eq;

    fn regions(values: &[Option<&str>]) -> Dataset {
        Dataset::new(
            vec!["REGION".into(), "ID".into()],
            values
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let region = v.map_or(Value::Missing, |s| Value::Text(s.to_string()));
                    vec![region, Value::Number(i as f64)]
                })
                .collect(),
        )
    }

    #[test]
    fn all_selection_returns_rows_unchanged() {
        let ds = regions(&[Some("North"), Some("East"), None]);
        let outcome = filter_by_region(&ds, "REGION", &Selection::All);
        assert_eq!(outcome.dataset, ds);
        assert_eq!(outcome.status, FilterStatus::AllRegions);
    }

    #[test]
    fn region_selection_keeps_matching_rows_in_order() {
        let ds = regions(&[Some("North"), Some("East"), Some("North"), None]);
        let outcome = filter_by_region(&ds, "REGION", &Selection::Region("North".into()));
        let ids: Vec<_> = outcome
            .dataset
            .column_values("ID")
            .unwrap()
            .cloned()
            .collect();
        assert_eq!(ids, vec![Value::Number(0.0), Value::Number(2.0)]);
    }

    #[test]
    fn no_match_yields_empty_dataset_with_schema() {
        let ds = regions(&[Some("North"), Some("East")]);
        let outcome = filter_by_region(&ds, "REGION", &Selection::Region("South".into()));
        assert!(outcome.dataset.is_empty());
        assert_eq!(outcome.dataset.columns(), ds.columns());
        assert_eq!(
            outcome.status,
            FilterStatus::Applied {
                region: "South".into()
            }
        );
    }

    #[test]
    fn absent_column_degrades_to_unfiltered() {
        let ds = regions(&[Some("North")]);
        let outcome = filter_by_region(&ds, "ZONA", &Selection::Region("North".into()));
        assert_eq!(outcome.dataset, ds);
        assert_eq!(
            outcome.status,
            FilterStatus::Unavailable {
                column: "ZONA".into()
            }
        );
        assert_eq!(region_choices(&ds, "ZONA"), None);
    }

    #[test]
    fn choices_are_distinct_and_skip_missing() {
        let ds = regions(&[Some("North"), None, Some("East"), Some("North")]);
        assert_eq!(
            region_choices(&ds, "REGION"),
            Some(vec!["North".to_string(), "East".to_string()])
        );
    }
}
