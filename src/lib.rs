// Sales dashboard core.
//
// The pipeline re-runs in full on every interaction:
// - `loader` reads the first sheet of an uploaded workbook,
// - `schema` checks which expected columns are present,
// - `filter` narrows rows to one region,
// - `reports` computes the overview metrics and per-salesperson chart series,
// - `entity` builds the report for one selected salesperson,
// - `output` encodes rows as CSV and renders terminal previews.
// `session` ties these together for one user; `main.rs` is the terminal front end.
pub mod config;
pub mod entity;
pub mod errors;
pub mod filter;
pub mod loader;
pub mod output;
pub mod reports;
pub mod schema;
pub mod session;
pub mod types;
pub mod util;

pub use config::{ColumnNames, DashboardConfig};
pub use errors::{DashboardError, MissingColumns};
pub use session::{Dashboard, Section, Session};
pub use types::{AggregateRow, Dataset, EntityReport, Metric, SalesAggregates, Selection, Value};
