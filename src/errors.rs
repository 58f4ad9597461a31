use std::io;

use thiserror::Error;

/// Hard failures of the dashboard pipeline.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("uploaded file is not a readable spreadsheet: {0}")]
    MalformedInput(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<calamine::Error> for DashboardError {
    fn from(err: calamine::Error) -> Self {
        DashboardError::MalformedInput(err.to_string())
    }
}

/// Columns a feature needs but the dataset lacks.
///
/// This is a warning, not a failure: callers skip the affected section and
/// report `columns` in the order they were requested.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing columns: {}", columns.join(", "))]
pub struct MissingColumns {
    pub columns: Vec<String>,
}
