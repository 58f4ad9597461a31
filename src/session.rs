// Per-user dashboard state.
//
// A `Session` owns the uploaded dataset and the current region choice.
// Every interaction calls `Session::dashboard`, which re-runs the pipeline
// from the upload; nothing else survives between interactions.

use std::path::Path;

use serde::Serialize;

use crate::config::DashboardConfig;
use crate::entity::{build_entity_report, salesperson_choices};
use crate::errors::{DashboardError, MissingColumns};
use crate::filter::{filter_by_region, region_choices, FilterStatus};
use crate::loader::{load_workbook, load_workbook_path, LoadReport};
use crate::reports::{sales_by_salesperson, summary_metrics};
use crate::types::{Dataset, EntityReport, SalesAggregates, Selection, SummaryMetrics};

/// A dashboard section that either rendered or was skipped for missing columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    Ready { data: T },
    Skipped { missing: Vec<String> },
}

impl<T> From<Result<T, MissingColumns>> for Section<T> {
    fn from(result: Result<T, MissingColumns>) -> Self {
        match result {
            Ok(data) => Section::Ready { data },
            Err(err) => Section::Skipped {
                missing: err.columns,
            },
        }
    }
}

/// Everything the presentation layer shows for one interaction.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub summary: SummaryMetrics,
    /// `None` when the region column is absent.
    pub region_choices: Option<Vec<String>>,
    pub filter: FilterStatus,
    pub filtered_records: usize,
    pub charts: Section<SalesAggregates>,
    pub salespeople: Section<Vec<String>>,
    #[serde(skip)]
    filtered: Dataset,
}

impl Dashboard {
    /// Rows left after the region filter, with the identity column derived when possible.
    pub fn filtered(&self) -> &Dataset {
        &self.filtered
    }

    pub fn entity_report(
        &mut self,
        config: &DashboardConfig,
        identity: &str,
    ) -> Result<EntityReport, MissingColumns> {
        build_entity_report(&mut self.filtered, &config.columns, identity)
    }
}

#[derive(Debug, Default)]
pub struct Session {
    config: DashboardConfig,
    dataset: Option<Dataset>,
    load_report: Option<LoadReport>,
    selection: Selection,
}

impl Session {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn load_report(&self) -> Option<&LoadReport> {
        self.load_report.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replace the uploaded dataset. A failed upload keeps the previous one.
    pub fn upload(&mut self, bytes: &[u8]) -> Result<&LoadReport, DashboardError> {
        let loaded = load_workbook(bytes)?;
        Ok(self.install(loaded))
    }

    pub fn upload_path(&mut self, path: &Path) -> Result<&LoadReport, DashboardError> {
        let loaded = load_workbook_path(path)?;
        Ok(self.install(loaded))
    }

    fn install(&mut self, (dataset, report): (Dataset, LoadReport)) -> &LoadReport {
        self.dataset = Some(dataset);
        self.selection = Selection::All;
        self.load_report.insert(report)
    }

    pub fn select_region(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Run the whole pipeline for the current upload and region choice.
    pub fn dashboard(&self) -> Option<Dashboard> {
        let dataset = self.dataset.as_ref()?;
        let columns = &self.config.columns;

        let summary = summary_metrics(dataset, columns);
        let choices = region_choices(dataset, &columns.region);
        let outcome = filter_by_region(dataset, &columns.region, &self.selection);
        let mut filtered = outcome.dataset;

        let charts = sales_by_salesperson(&mut filtered, columns).into();
        let salespeople = salesperson_choices(&mut filtered, columns).into();

        Some(Dashboard {
            summary,
            region_choices: choices,
            filter: outcome.status,
            filtered_records: filtered.len(),
            charts,
            salespeople,
            filtered,
        })
    }
}
