use std::collections::HashMap;

use tracing::debug;

use crate::config::ColumnNames;
use crate::errors::MissingColumns;
use crate::schema::{chart_readiness, column_metric};
use crate::types::{AggregateRow, Dataset, SalesAggregates, SummaryMetrics};
use crate::util::{average, total};

/// The four overview metrics; each degrades on its own when its column is absent.
pub fn summary_metrics(dataset: &Dataset, columns: &ColumnNames) -> SummaryMetrics {
    SummaryMetrics {
        total_records: dataset.len(),
        total_sales: column_metric(dataset, &columns.sales, total),
        total_units: column_metric(dataset, &columns.units, total),
        average_sale: column_metric(dataset, &columns.sales, average),
    }
}

/// Per-salesperson units sum, sales sum and sales mean.
///
/// Requires the four chart columns; derives the identity column on first use.
/// Rows without an identity are not grouped. A salesperson with no numeric
/// sales has no average bar.
pub fn sales_by_salesperson(
    dataset: &mut Dataset,
    columns: &ColumnNames,
) -> Result<SalesAggregates, MissingColumns> {
    chart_readiness(dataset, columns)?;
    let identity_idx = dataset.derive_identity(columns)?;
    let missing = |name: &str| MissingColumns {
        columns: vec![name.to_string()],
    };
    let units_idx = dataset
        .column_index(&columns.units)
        .ok_or_else(|| missing(columns.units.as_str()))?;
    let sales_idx = dataset
        .column_index(&columns.sales)
        .ok_or_else(|| missing(columns.sales.as_str()))?;

    #[derive(Default)]
    struct Acc {
        identity: String,
        units: f64,
        sales: f64,
        sales_count: usize,
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Acc> = Vec::new();
    for row in dataset.rows() {
        let Some(identity) = row[identity_idx].as_text() else {
            continue;
        };
        let slot = match index.get(identity.as_ref()).copied() {
            Some(slot) => slot,
            None => {
                index.insert(identity.to_string(), groups.len());
                groups.push(Acc {
                    identity: identity.into_owned(),
                    ..Acc::default()
                });
                groups.len() - 1
            }
        };
        let acc = &mut groups[slot];
        if let Some(units) = row[units_idx].as_number() {
            acc.units += units;
        }
        if let Some(sales) = row[sales_idx].as_number() {
            acc.sales += sales;
            acc.sales_count += 1;
        }
    }
    debug!(rows = dataset.len(), salespeople = groups.len(), "aggregated sales");

    let mut out = SalesAggregates::default();
    for acc in groups {
        out.units_sold.push(AggregateRow {
            identity: acc.identity.clone(),
            value: acc.units,
        });
        out.total_sales.push(AggregateRow {
            identity: acc.identity.clone(),
            value: acc.sales,
        });
        if acc.sales_count > 0 {
            out.average_sales.push(AggregateRow {
                identity: acc.identity,
                value: acc.sales / acc.sales_count as f64,
            });
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Metric, Value};
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn sales() -> Dataset {
        Dataset::new(
            vec![
                "NOMBRE".into(),
                "APELLIDO".into(),
                "UNIDADES VENDIDAS".into(),
                "VENTAS TOTALES".into(),
            ],
            vec![
                vec![text("Ana"), text("Lopez"), Value::Number(10.0), Value::Number(100.0)],
                vec![text("Ben"), text("Ruiz"), Value::Number(3.0), Value::Missing],
                vec![text("Ana"), text("Lopez"), Value::Number(5.0), Value::Number(50.0)],
                vec![Value::Missing, text("Ghost"), Value::Number(99.0), Value::Number(9.0)],
            ],
        )
    }

    fn row(identity: &str, value: f64) -> AggregateRow {
        AggregateRow {
            identity: identity.to_string(),
            value,
        }
    }

    #[test]
    fn groups_in_first_seen_order() {
        let mut ds = sales();
        let agg = sales_by_salesperson(&mut ds, &ColumnNames::default()).unwrap();
        assert_eq!(agg.units_sold, vec![row("Ana Lopez", 15.0), row("Ben Ruiz", 3.0)]);
        assert_eq!(agg.total_sales, vec![row("Ana Lopez", 150.0), row("Ben Ruiz", 0.0)]);
        assert_eq!(agg.average_sales, vec![row("Ana Lopez", 75.0)]);
        assert!(ds.has_column("VENDEDOR"));
    }

    #[test]
    fn single_row_sum_equals_mean() {
        let mut ds = sales().select_rows(|r| r[2] == Value::Number(5.0));
        let agg = sales_by_salesperson(&mut ds, &ColumnNames::default()).unwrap();
        assert_eq!(agg.total_sales, vec![row("Ana Lopez", 50.0)]);
        assert_eq!(agg.average_sales, agg.total_sales);
    }

    #[test]
    fn missing_sales_column_skips_charts() {
        let mut ds = Dataset::new(
            vec!["NOMBRE".into(), "APELLIDO".into(), "UNIDADES VENDIDAS".into()],
            vec![vec![text("Ana"), text("Lopez"), Value::Number(1.0)]],
        );
        let err = sales_by_salesperson(&mut ds, &ColumnNames::default()).unwrap_err();
        assert_eq!(err.columns, vec!["VENTAS TOTALES"]);
        assert!(!ds.has_column("VENDEDOR"));
    }

    #[test]
    fn empty_dataset_gives_empty_series() {
        let mut ds = sales().empty_like();
        let agg = sales_by_salesperson(&mut ds, &ColumnNames::default()).unwrap();
        assert_eq!(agg, SalesAggregates::default());
    }

    #[test]
    fn summary_metrics_degrade_per_column() {
        let ds = Dataset::new(
            vec!["UNIDADES VENDIDAS".into()],
            vec![vec![Value::Number(4.0)], vec![Value::Number(6.0)]],
        );
        let summary = summary_metrics(&ds, &ColumnNames::default());
        assert_eq!(summary.total_records, 2);
        assert_eq!(summary.total_units, Metric::Available(10.0));
        assert_eq!(summary.total_sales, Metric::NotAvailable);
        assert_eq!(summary.average_sale, Metric::NotAvailable);
    }
}
