use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tabled::{builder::Builder, settings::Style};
use tracing::info;

use crate::errors::DashboardError;
use crate::types::{AggregateRow, Dataset, EntityReport};
use crate::util::format_number;

const BAR_WIDTH: usize = 40;

/// Comma-separated encoding with a header row; quoting follows RFC 4180.
pub fn encode_csv(dataset: &Dataset) -> Result<String, DashboardError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(dataset.columns())?;
    for row in dataset.rows() {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// `Ana Lopez` becomes `Ana_Lopez_data.csv` with the default suffix.
pub fn export_file_name(identity: &str, suffix: &str) -> String {
    format!("{}{}", identity.replace(' ', "_"), suffix)
}

/// Write a salesperson's rows to `dir`, returning the path written.
pub fn write_export(
    dir: &Path,
    report: &EntityReport,
    suffix: &str,
) -> Result<PathBuf, DashboardError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(&report.identity, suffix));
    std::fs::write(&path, encode_csv(&report.rows)?)?;
    info!(path = %path.display(), rows = report.record_count, "exported salesperson data");
    Ok(path)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), DashboardError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Markdown table of the first `max_rows` rows.
pub fn preview_dataset(dataset: &Dataset, max_rows: usize) -> String {
    if dataset.is_empty() {
        return "(no rows)".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(dataset.columns().iter().cloned());
    for row in dataset.rows().iter().take(max_rows) {
        builder.push_record(row.iter().map(|v| v.to_string()));
    }
    let mut table = builder.build();
    table.with(Style::markdown());
    let mut out = table.to_string();
    if dataset.len() > max_rows {
        out.push_str(&format!("\n... {} more rows", dataset.len() - max_rows));
    }
    out
}

/// Horizontal bar chart scaled to the largest magnitude in `rows`.
pub fn render_bar_chart(title: &str, rows: &[AggregateRow], decimals: usize) -> String {
    if rows.is_empty() {
        return format!("{}\n(no data)", title);
    }
    let max = rows.iter().map(|r| r.value.abs()).fold(0.0_f64, f64::max);
    let mut builder = Builder::default();
    builder.push_record(["Salesperson", "", "Value"]);
    for row in rows {
        let len = if max > 0.0 {
            ((row.value.abs() / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        builder.push_record([
            row.identity.clone(),
            "#".repeat(len),
            format_number(row.value, decimals),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::blank());
    format!("{}\n{}", title, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Metric, Value};
    use pretty_assertions::assert_eq;

    fn two_rows() -> Dataset {
        Dataset::new(
            vec!["NOMBRE".into(), "NOTA".into(), "VENTAS TOTALES".into()],
            vec![
                vec![
                    Value::Text("Ana".into()),
                    Value::Text("North, coastal".into()),
                    Value::Number(100.0),
                ],
                vec![
                    Value::Text("Luis".into()),
                    Value::Text("said \"hi\"".into()),
                    Value::Missing,
                ],
            ],
        )
    }

    #[test]
    fn csv_quotes_embedded_delimiters() {
        let encoded = encode_csv(&two_rows()).unwrap();
        assert_eq!(
            encoded,
            "NOMBRE,NOTA,VENTAS TOTALES\nAna,\"North, coastal\",100\nLuis,\"said \"\"hi\"\"\",\n"
        );
    }

    #[test]
    fn file_name_replaces_spaces() {
        assert_eq!(export_file_name("Ana Maria Lopez", "_data.csv"), "Ana_Maria_Lopez_data.csv");
    }

    #[test]
    fn write_export_creates_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let report = EntityReport {
            identity: "Ana Lopez".into(),
            rows: two_rows(),
            record_count: 2,
            total_sales: Metric::Available(100.0),
            total_units: Metric::NotAvailable,
            reference_salary: Metric::NotAvailable,
        };
        let path = write_export(&dir.path().join("exports"), &report, "_data.csv").unwrap();
        assert_eq!(path.file_name().unwrap(), "Ana_Lopez_data.csv");
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.starts_with("NOMBRE,NOTA,VENTAS TOTALES\n"));
    }

    #[test]
    fn write_json_serializes_not_available_as_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let metric: Metric<f64> = Metric::NotAvailable;
        write_json(&path, &serde_json::json!({ "total_sales": metric })).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert!(value["total_sales"].is_null());
    }

    #[test]
    fn bar_chart_scales_to_largest_value() {
        let rows = vec![
            AggregateRow {
                identity: "Ana Lopez".into(),
                value: 150.0,
            },
            AggregateRow {
                identity: "Ben Ruiz".into(),
                value: 75.0,
            },
        ];
        let chart = render_bar_chart("Total Sales", &rows, 0);
        assert!(chart.contains(&"#".repeat(BAR_WIDTH)));
        assert!(chart.contains(&"#".repeat(BAR_WIDTH / 2)));
        assert!(!chart.contains(&"#".repeat(BAR_WIDTH + 1)));
    }

    #[test]
    fn empty_previews_say_so() {
        assert_eq!(preview_dataset(&two_rows().empty_like(), 5), "(no rows)");
        assert_eq!(render_bar_chart("Units", &[], 0), "Units\n(no data)");
    }
}
