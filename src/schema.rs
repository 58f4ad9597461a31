// Column presence checks.
//
// Every feature asks for its own columns and degrades on its own; nothing
// here fails the whole dashboard.

use crate::config::ColumnNames;
use crate::errors::MissingColumns;
use crate::types::{Dataset, Metric};

/// Requested columns split by presence, both in request order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnCheck {
    pub present: Vec<String>,
    pub missing: Vec<String>,
}

impl ColumnCheck {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn check_columns(dataset: &Dataset, required: &[&str]) -> ColumnCheck {
    let mut check = ColumnCheck::default();
    for name in required {
        if dataset.has_column(name) {
            check.present.push(name.to_string());
        } else {
            check.missing.push(name.to_string());
        }
    }
    check
}

/// All four chart columns must be present, otherwise the chart section is skipped.
pub fn chart_readiness(dataset: &Dataset, columns: &ColumnNames) -> Result<(), MissingColumns> {
    let check = check_columns(dataset, &columns.chart_columns());
    if check.is_complete() {
        Ok(())
    } else {
        Err(MissingColumns {
            columns: check.missing,
        })
    }
}

/// Run `compute` over the numeric cells of `column`, or report it unavailable.
pub(crate) fn column_metric<F>(dataset: &Dataset, column: &str, compute: F) -> Metric<f64>
where
    F: FnOnce(&[f64]) -> Option<f64>,
{
    match dataset.numeric_values(column) {
        Some(values) => Metric::from_option(compute(&values)),
        None => Metric::NotAvailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;
    use pretty_assertions::assert_eq;

    fn dataset(columns: &[&str]) -> Dataset {
        Dataset::new(
            columns.iter().map(|c| c.to_string()).collect(),
            vec![vec![Value::Number(1.0); columns.len()]],
        )
    }

    #[test]
    fn check_columns_preserves_request_order() {
        let ds = dataset(&["APELLIDO", "REGION"]);
        let check = check_columns(&ds, &["NOMBRE", "REGION", "SALARIO", "APELLIDO"]);
        assert_eq!(check.present, vec!["REGION", "APELLIDO"]);
        assert_eq!(check.missing, vec!["NOMBRE", "SALARIO"]);
        assert!(!check.is_complete());
        assert_eq!(check_columns(&ds, &["region"]).missing, vec!["region"]);
    }

    #[test]
    fn chart_readiness_lists_every_missing_column() {
        let ds = dataset(&["NOMBRE", "UNIDADES VENDIDAS"]);
        let err = chart_readiness(&ds, &ColumnNames::default()).unwrap_err();
        assert_eq!(err.columns, vec!["VENTAS TOTALES", "APELLIDO"]);
    }

    #[test]
    fn chart_readiness_passes_with_all_columns() {
        let ds = dataset(&["NOMBRE", "APELLIDO", "VENTAS TOTALES", "UNIDADES VENDIDAS"]);
        assert_eq!(chart_readiness(&ds, &ColumnNames::default()), Ok(()));
    }

    #[test]
    fn column_metric_is_not_available_for_absent_column() {
        let ds = dataset(&["REGION"]);
        let sum = |v: &[f64]| -> Option<f64> { Some(v.iter().sum()) };
        assert_eq!(column_metric(&ds, "VENTAS TOTALES", sum), Metric::NotAvailable);
        assert_eq!(column_metric(&ds, "REGION", sum), Metric::Available(1.0));
    }
}
