use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::{LATEST_LIMIT, STREAM_LIMIT};
use crate::model::{DataPoint, NewDataPoint, Report, ValidationError};
use crate::realtime::Broadcaster;
use crate::store::{CollectionsExt, Direction, Query, SharedStore, StoreError};

/// Error type for analytics operations.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Point-in-time view for the dashboard header and chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_data_points: usize,
    /// Newest first, at most [`LATEST_LIMIT`].
    pub latest_data: Vec<DataPoint>,
    pub report_count: usize,
    /// Server time when the summary was taken.
    pub timestamp: DateTime<Utc>,
}

/// Accepts data points and answers aggregate reads over them.
///
/// Every successful ingest is handed to the broadcaster exactly once.
#[derive(Clone)]
pub struct AnalyticsService {
    store: SharedStore,
    broadcaster: Arc<dyn Broadcaster>,
}

fn newest_first<'q>(query: Query<'q, DataPoint>) -> Query<'q, DataPoint> {
    query.sort_by(Direction::Descending, |a, b| a.timestamp.cmp(&b.timestamp))
}

impl AnalyticsService {
    pub fn new(store: SharedStore, broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self { store, broadcaster }
    }

    /// Validate a raw body, then [`ingest_point`](Self::ingest_point).
    pub fn ingest(&self, body: Value) -> Result<DataPoint, AnalyticsError> {
        let input = NewDataPoint::from_json(body)?;
        self.ingest_point(input)
    }

    /// Store a point and broadcast it. Nothing is broadcast if the write fails.
    pub fn ingest_point(&self, input: NewDataPoint) -> Result<DataPoint, AnalyticsError> {
        let point = self
            .store
            .collection::<DataPoint>()
            .insert(input.into_data_point(Utc::now()))?;

        info!(id = %point.id, dataset_id = %point.dataset_id, "data point ingested");
        let delivered = self.broadcaster.broadcast_new_point(&point);
        debug!(id = %point.id, delivered, "data point broadcast");

        Ok(point)
    }

    /// Totals plus the most recent points across all datasets.
    pub fn dashboard_summary(&self) -> Result<DashboardSummary, AnalyticsError> {
        let points = self.store.collection::<DataPoint>();

        Ok(DashboardSummary {
            total_data_points: points.count()?,
            latest_data: points.find(newest_first(Query::new()).limit(LATEST_LIMIT))?,
            report_count: self.store.collection::<Report>().count()?,
            timestamp: Utc::now(),
        })
    }

    /// Up to `limit` points of one dataset, newest first. Unknown datasets
    /// yield an empty list.
    pub fn dataset_history(
        &self,
        dataset_id: &str,
        limit: usize,
    ) -> Result<Vec<DataPoint>, AnalyticsError> {
        let query = newest_first(Query::new().filter(|p: &DataPoint| p.dataset_id == dataset_id))
            .limit(limit);
        Ok(self.store.collection::<DataPoint>().find(query)?)
    }

    /// The snapshot sent in reply to a realtime `data:stream` request.
    pub fn recent_for_dataset(&self, dataset_id: &str) -> Result<Vec<DataPoint>, AnalyticsError> {
        self.dataset_history(dataset_id, STREAM_LIMIT)
    }
}
