use tracing::{debug, warn};

use crate::config::ColumnNames;
use crate::errors::MissingColumns;
use crate::schema::column_metric;
use crate::types::{distinct_in_order, Dataset, EntityReport, Metric, Value};
use crate::util::total;

/// Salespeople available for detailed analysis, in first-seen order.
pub fn salesperson_choices(
    dataset: &mut Dataset,
    columns: &ColumnNames,
) -> Result<Vec<String>, MissingColumns> {
    let idx = dataset.derive_identity(columns)?;
    Ok(distinct_in_order(dataset.rows().iter().map(|r| &r[idx])))
}

/// Rows and metrics of one salesperson.
///
/// Salary is read from the first matching row rather than aggregated; rows
/// for the same salesperson are assumed to carry the same salary.
pub fn build_entity_report(
    dataset: &mut Dataset,
    columns: &ColumnNames,
    identity: &str,
) -> Result<EntityReport, MissingColumns> {
    let idx = dataset.derive_identity(columns)?;
    let rows = dataset.select_rows(|r| r[idx].as_text().is_some_and(|v| v == identity));
    debug!(identity, rows = rows.len(), "selected salesperson rows");

    if rows.is_empty() {
        return Ok(EntityReport {
            identity: identity.to_string(),
            rows,
            record_count: 0,
            total_sales: Metric::NotAvailable,
            total_units: Metric::NotAvailable,
            reference_salary: Metric::NotAvailable,
        });
    }

    let reference_salary = match rows.column_values(&columns.salary) {
        Some(cells) => {
            let salaries: Vec<Option<f64>> = cells.map(Value::as_number).collect();
            if salary_varies(&salaries) {
                warn!(
                    identity,
                    rows = salaries.len(),
                    "salary varies across rows, reporting the first row only"
                );
            }
            Metric::from_option(salaries.first().copied().flatten())
        }
        None => Metric::NotAvailable,
    };

    Ok(EntityReport {
        identity: identity.to_string(),
        record_count: rows.len(),
        total_sales: column_metric(&rows, &columns.sales, total),
        total_units: column_metric(&rows, &columns.units, total),
        reference_salary,
        rows,
    })
}

/// True when any row's salary differs from the first one; a missing salary
/// next to a present one counts as a difference.
fn salary_varies(salaries: &[Option<f64>]) -> bool {
    salaries
        .split_first()
        .is_some_and(|(first, rest)| rest.iter().any(|s| s != first))
}
