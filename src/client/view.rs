use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::analytics::DashboardSummary;
use crate::model::{DataPoint, Report};
use crate::realtime::{ClientEvent, ServerEvent};

/// Live points kept by the dashboard.
pub const LIVE_BUFFER: usize = 100;

/// A read the dashboard issues when its connection comes up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    DashboardSummary,
    Reports,
}

/// Everything the dashboard shows, independent of how it is drawn.
#[derive(Debug, Clone)]
pub struct DashboardView {
    summary: Option<DashboardSummary>,
    /// Newest first.
    live: VecDeque<DataPoint>,
    reports: Vec<Report>,
    /// Stream responses keyed by the dataset that was selected when they arrived.
    datasets: HashMap<String, Vec<DataPoint>>,
    selected: Option<String>,
    loading: bool,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardView {
    /// An empty view, loading until the first summary fetch settles.
    pub fn new() -> Self {
        Self {
            summary: None,
            live: VecDeque::with_capacity(LIVE_BUFFER),
            reports: Vec::new(),
            datasets: HashMap::new(),
            selected: None,
            loading: true,
        }
    }

    /// The connection is up: these reads should be issued, once each.
    pub fn on_connected(&self) -> [Fetch; 2] {
        [Fetch::DashboardSummary, Fetch::Reports]
    }

    /// A summary fetch succeeded. Its latest points replace the live buffer.
    pub fn apply_summary(&mut self, summary: DashboardSummary) {
        self.live = summary.latest_data.iter().take(LIVE_BUFFER).cloned().collect();
        self.summary = Some(summary);
        self.loading = false;
    }

    /// A summary fetch failed. The view stays stale but stops loading.
    pub fn summary_failed(&mut self) {
        self.loading = false;
    }

    pub fn apply_reports(&mut self, reports: Vec<Report>) {
        self.reports = reports;
    }

    /// A `data:new` point arrived. Every dataset lands in the same buffer.
    pub fn on_new_point(&mut self, point: DataPoint) {
        self.live.push_front(point);
        self.live.truncate(LIVE_BUFFER);
    }

    /// A `data:stream:response` arrived. Stored under the current selection;
    /// dropped when nothing is selected. Returns whether it was stored.
    pub fn on_stream_response(&mut self, points: Vec<DataPoint>) -> bool {
        match &self.selected {
            Some(dataset_id) => {
                self.datasets.insert(dataset_id.clone(), points);
                true
            }
            None => false,
        }
    }

    /// Feed a server event into the view.
    pub fn apply_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::DataNew(point) => self.on_new_point(point),
            ServerEvent::StreamResponse(points) => {
                self.on_stream_response(points);
            }
            ServerEvent::Error(message) => warn!(error = %message, "server reported an error"),
        }
    }

    /// "View data" on a report: select its first dataset. Returns the
    /// events to send, or nothing if the report references no dataset.
    pub fn select_report(&mut self, report: &Report) -> Vec<ClientEvent> {
        match report.primary_dataset() {
            Some(dataset_id) => self.select_dataset(dataset_id),
            None => Vec::new(),
        }
    }

    /// Make `dataset_id` the current selection. Cached results for other
    /// datasets are kept.
    pub fn select_dataset(&mut self, dataset_id: &str) -> Vec<ClientEvent> {
        self.selected = Some(dataset_id.to_string());
        vec![
            ClientEvent::SubscribeDataset(dataset_id.to_string()),
            ClientEvent::DataStream(dataset_id.to_string()),
        ]
    }

    pub fn summary(&self) -> Option<&DashboardSummary> {
        self.summary.as_ref()
    }

    /// Live points, newest first.
    pub fn live(&self) -> impl DoubleEndedIterator<Item = &DataPoint> + ExactSizeIterator {
        self.live.iter()
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Cached stream response for a dataset.
    pub fn dataset(&self, dataset_id: &str) -> Option<&[DataPoint]> {
        self.datasets.get(dataset_id).map(Vec::as_slice)
    }

    /// Rows of the table for the current selection, once its data arrived.
    pub fn selected_rows(&self) -> Option<&[DataPoint]> {
        self.selected.as_deref().and_then(|id| self.dataset(id))
    }

    pub fn total_data_points(&self) -> usize {
        self.summary.as_ref().map_or(0, |s| s.total_data_points)
    }

    pub fn report_count(&self) -> usize {
        self.summary.as_ref().map_or(0, |s| s.report_count)
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.summary.as_ref().map(|s| s.timestamp)
    }
}
