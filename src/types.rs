use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::config::ColumnNames;
use crate::errors::MissingColumns;
use crate::util::{display_number, parse_f64_safe};

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
    Missing,
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric reading of the cell; text is parsed leniently, missing stays `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::Number(_) => None,
            Value::Text(s) => parse_f64_safe(Some(s)),
            Value::Missing => None,
        }
    }

    /// Textual reading of the cell, `None` when missing.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(display_number(*n))),
            Value::Missing => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => f.write_str(&display_number(*n)),
            Value::Missing => Ok(()),
        }
    }
}

/// In-memory table loaded from one uploaded sheet.
///
/// Every row holds exactly one value per column; absent cells are `Value::Missing`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Missing);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Same schema, no rows.
    pub fn empty_like(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell lookup by row position and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// All cells of one column in row order, `None` if the column is absent.
    pub fn column_values<'a>(
        &'a self,
        column: &str,
    ) -> Option<impl Iterator<Item = &'a Value> + 'a> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(move |r| &r[idx]))
    }

    /// Numeric cells of one column; cells that are not numbers are skipped.
    pub fn numeric_values(&self, column: &str) -> Option<Vec<f64>> {
        Some(self.column_values(column)?.filter_map(Value::as_number).collect())
    }

    /// Rows satisfying `keep`, in their original order, under the same schema.
    pub fn select_rows<F>(&self, mut keep: F) -> Dataset
    where
        F: FnMut(&[Value]) -> bool,
    {
        Dataset {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Replace the values of `name`, appending the column when it does not exist yet.
    fn set_column(&mut self, name: &str, values: Vec<Value>) -> usize {
        let idx = match self.column_index(name) {
            Some(idx) => idx,
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(Value::Missing);
                }
                self.columns.len() - 1
            }
        };
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[idx] = value;
        }
        idx
    }

    /// Derive the salesperson identity (`first last`) into `columns.identity`.
    ///
    /// Idempotent: an existing identity column is overwritten with the same
    /// values, never duplicated. Returns the identity column's index.
    pub fn derive_identity(&mut self, columns: &ColumnNames) -> Result<usize, MissingColumns> {
        let missing: Vec<String> = [&columns.first_name, &columns.last_name]
            .into_iter()
            .filter(|c| !self.has_column(c))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(MissingColumns { columns: missing });
        }
        let first = self.column_index(&columns.first_name).unwrap_or_default();
        let last = self.column_index(&columns.last_name).unwrap_or_default();
        let values: Vec<Value> = self
            .rows
            .iter()
            .map(|r| match (r[first].as_text(), r[last].as_text()) {
                (Some(f), Some(l)) => Value::Text(format!("{} {}", f, l)),
                _ => Value::Missing,
            })
            .collect();
        Ok(self.set_column(&columns.identity, values))
    }
}

/// A metric that is either computed or unavailable because its column is absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Metric<T> {
    Available(T),
    NotAvailable,
}

impl<T> Metric<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Metric::Available(v),
            None => Metric::NotAvailable,
        }
    }

    /// Render with `f`, or `N/A` when unavailable.
    pub fn render<F>(&self, f: F) -> String
    where
        F: FnOnce(&T) -> String,
    {
        match self {
            Metric::Available(v) => f(v),
            Metric::NotAvailable => "N/A".to_string(),
        }
    }
}

/// Region filter choice for one interaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Region(String),
}

/// One bar of a per-salesperson chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub identity: String,
    pub value: f64,
}

/// The three chart series, each in first-seen salesperson order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SalesAggregates {
    pub units_sold: Vec<AggregateRow>,
    pub total_sales: Vec<AggregateRow>,
    pub average_sales: Vec<AggregateRow>,
}

/// Top-level metrics over the uploaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_records: usize,
    pub total_sales: Metric<f64>,
    pub total_units: Metric<f64>,
    pub average_sale: Metric<f64>,
}

/// Metrics and rows for one selected salesperson.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityReport {
    pub identity: String,
    #[serde(skip)]
    pub rows: Dataset,
    pub record_count: usize,
    pub total_sales: Metric<f64>,
    pub total_units: Metric<f64>,
    /// Salary from the first row of the subset, not an aggregate.
    pub reference_salary: Metric<f64>,
}

/// Distinct non-missing texts of a column in first-seen order.
pub(crate) fn distinct_in_order<'a, I>(values: I) -> Vec<String>
where
    I: Iterator<Item = &'a Value>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for v in values {
        if let Some(text) = v.as_text() {
            if seen.insert(text.to_string()) {
                out.push(text.into_owned());
            }
        }
    }
    out
}
