use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Range, Reader};
use chrono::{NaiveDateTime, NaiveTime};
use tracing::{debug, info};

use crate::errors::DashboardError;
use crate::types::{Dataset, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub sheet_name: String,
    pub total_rows: usize,
    pub skipped_blank_rows: usize,
    pub columns: usize,
}

/// Parse an uploaded workbook (xlsx, xls, xlsb or ods) into a [`Dataset`].
///
/// Only the first sheet is read; its first row supplies the column names.
pub fn load_workbook(bytes: &[u8]) -> Result<(Dataset, LoadReport), DashboardError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let sheet_names = workbook.sheet_names();
    let Some(sheet_name) = sheet_names.first().cloned() else {
        return Err(DashboardError::MalformedInput(
            "workbook contains no sheets".to_string(),
        ));
    };
    let range = workbook.worksheet_range(&sheet_name)?;
    let (rows, cols) = range.get_size();
    info!(sheet = %sheet_name, rows, cols, sheets = sheet_names.len(), "reading first sheet");

    let (dataset, skipped_blank_rows) = dataset_from_range(&range);
    let report = LoadReport {
        sheet_name,
        total_rows: dataset.len(),
        skipped_blank_rows,
        columns: dataset.columns().len(),
    };
    Ok((dataset, report))
}

pub fn load_workbook_path(path: &Path) -> Result<(Dataset, LoadReport), DashboardError> {
    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "read workbook from disk");
    load_workbook(&bytes)
}

fn dataset_from_range(range: &Range<Data>) -> (Dataset, usize) {
    let mut rows_iter = range.rows();
    let Some(header) = rows_iter.next() else {
        return (Dataset::default(), 0);
    };
    let columns = dedupe_headers(
        header
            .iter()
            .enumerate()
            .map(|(idx, cell)| match cell_value(cell).as_text() {
                Some(name) => name.into_owned(),
                None => format!("Unnamed: {}", idx),
            })
            .collect(),
    );

    let mut skipped = 0usize;
    let mut rows = Vec::new();
    for raw in rows_iter {
        let row: Vec<Value> = raw.iter().map(cell_value).collect();
        if row.iter().all(Value::is_missing) {
            skipped += 1;
            continue;
        }
        rows.push(row);
    }
    (Dataset::new(columns, rows), skipped)
}

/// Repeated header names get a `.N` suffix (`NOMBRE`, `NOMBRE.1`, ...) so that
/// every column stays addressable by name.
fn dedupe_headers(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let count = seen.entry(name.clone()).or_insert(0);
        if *count == 0 {
            *count = 1;
            out.push(name);
            continue;
        }
        let mut renamed = format!("{}.{}", name, count);
        while taken.contains(&renamed) {
            *count += 1;
            renamed = format!("{}.{}", name, count);
        }
        *count += 1;
        debug!(column = %name, renamed = %renamed, "renamed duplicate header");
        taken.insert(renamed.clone());
        out.push(renamed);
    }
    out
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::String(s) => match s.trim() {
            "" => Value::Missing,
            t => Value::Text(t.to_string()),
        },
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Bool(b) => Value::Text(b.to_string()),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| Value::Text(format_datetime(dt)))
            .unwrap_or(Value::Missing),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
        Data::Error(_) | Data::Empty => Value::Missing,
    }
}

fn format_datetime(dt: NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
