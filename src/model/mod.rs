//! Entities and the validation boundary for incoming writes.
//!
//! Raw JSON bodies become validated `New*` inputs via `from_json`, and the
//! inputs become storable records once the server has stamped them.

mod data_point;
mod fields;
mod report;

pub use data_point::{DataPoint, NewDataPoint};
pub use report::{ChartType, NewReport, Report};

/// A write was rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {field}: {reason}")]
pub struct ValidationError {
    /// Offending field (camelCase, as on the wire), or `body`.
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
