//! Ingest & aggregation - data point writes and the dashboard read side.

mod service;

pub use service::{AnalyticsError, AnalyticsService, DashboardSummary};

/// Points returned in a dashboard summary.
pub const LATEST_LIMIT: usize = 100;
/// Default cap for a dataset history read.
pub const HISTORY_LIMIT: usize = 1000;
/// Points returned for a realtime `data:stream` request.
pub const STREAM_LIMIT: usize = 50;
