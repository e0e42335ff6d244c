//! Report registry - saved report definitions.

use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::model::{NewReport, Report, ValidationError};
use crate::store::{CollectionsExt, Query, SharedStore, StoreError};

/// Error type for registry operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Create and read report definitions.
#[derive(Clone)]
pub struct ReportRegistry {
    store: SharedStore,
}

impl ReportRegistry {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Validate a raw body and store the report.
    pub fn create_report(&self, body: Value) -> Result<Report, ReportError> {
        let input = NewReport::from_json(body)?;
        self.create(input)
    }

    /// Store a validated report. `createdAt` and `updatedAt` are set here.
    pub fn create(&self, input: NewReport) -> Result<Report, ReportError> {
        let report = self
            .store
            .collection::<Report>()
            .insert(input.into_report(Utc::now()))?;
        info!(id = %report.id, chart_type = %report.chart_type, "report created");
        Ok(report)
    }

    /// All reports, oldest first.
    pub fn list_reports(&self) -> Result<Vec<Report>, ReportError> {
        Ok(self.store.collection::<Report>().find(Query::new())?)
    }

    /// A report by id, or None if there is no such report.
    pub fn get_report(&self, id: &str) -> Result<Option<Report>, ReportError> {
        Ok(self.store.collection::<Report>().get(id)?)
    }
}
