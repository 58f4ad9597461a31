use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::DashboardError;

/// Names of the spreadsheet columns the dashboard reads.
///
/// Matching is exact (case- and spelling-sensitive).
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnNames {
    /// Category column used by the region filter.
    pub region: String,
    /// First half of the salesperson identity.
    pub first_name: String,
    /// Second half of the salesperson identity.
    pub last_name: String,
    /// Units sold per record.
    pub units: String,
    /// Sales total per record.
    pub sales: String,
    /// Salary of the salesperson, reported from the first matching row.
    pub salary: String,
    /// Name given to the derived identity column.
    pub identity: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            region: "REGION".to_string(),
            first_name: "NOMBRE".to_string(),
            last_name: "APELLIDO".to_string(),
            units: "UNIDADES VENDIDAS".to_string(),
            sales: "VENTAS TOTALES".to_string(),
            salary: "SALARIO".to_string(),
            identity: "VENDEDOR".to_string(),
        }
    }
}

impl ColumnNames {
    /// The four columns every sales chart needs, in reporting order.
    pub fn chart_columns(&self) -> [&str; 4] {
        [
            self.units.as_str(),
            self.sales.as_str(),
            self.first_name.as_str(),
            self.last_name.as_str(),
        ]
    }

    /// Columns listed in the welcome text before any upload.
    pub fn expected_columns(&self) -> Vec<&str> {
        vec![
            self.region.as_str(),
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.units.as_str(),
            self.sales.as_str(),
            self.salary.as_str(),
        ]
    }

    /// Read overrides from a JSON object; absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, DashboardError> {
        let raw = std::fs::read_to_string(path)?;
        let columns: ColumnNames = serde_json::from_str(&raw)
            .map_err(|e| DashboardError::Config(format!("{}: {}", path.display(), e)))?;
        columns.validate()?;
        Ok(columns)
    }

    fn validate(&self) -> Result<(), DashboardError> {
        let names = [
            &self.region,
            &self.first_name,
            &self.last_name,
            &self.units,
            &self.sales,
            &self.salary,
            &self.identity,
        ];
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(DashboardError::Config(
                "column names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Session-wide settings handed to every pipeline run.
#[derive(Clone, Debug)]
pub struct DashboardConfig {
    pub columns: ColumnNames,
    /// Label shown for the "no filter" region choice.
    pub all_regions_label: String,
    /// Appended to the salesperson name to form the export file name.
    pub export_suffix: String,
    /// Directory receiving CSV exports and JSON snapshots.
    pub out_dir: PathBuf,
    pub currency_symbol: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            all_regions_label: "All Regions".to_string(),
            export_suffix: "_data.csv".to_string(),
            out_dir: PathBuf::from("."),
            currency_symbol: "$".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_override_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"region": "ZONA"}}"#).unwrap();
        let columns = ColumnNames::from_json_file(file.path()).unwrap();
        assert_eq!(columns.region, "ZONA");
        assert_eq!(columns.first_name, "NOMBRE");
        assert_eq!(columns.identity, "VENDEDOR");
    }

    #[test]
    fn empty_column_name_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"sales": " "}}"#).unwrap();
        let err = ColumnNames::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn chart_columns_are_in_reporting_order() {
        let columns = ColumnNames::default();
        assert_eq!(
            columns.chart_columns(),
            ["UNIDADES VENDIDAS", "VENTAS TOTALES", "NOMBRE", "APELLIDO"]
        );
    }
}
