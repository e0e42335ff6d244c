//! Shared state handed to every handler.

use std::sync::Arc;

use crate::analytics::AnalyticsService;
use crate::realtime::Hub;
use crate::reports::ReportRegistry;
use crate::store::SharedStore;

/// Process-wide resources, built once at startup.
///
/// Cloned into each handler via Axum's State extractor; clones share the
/// same store and hub.
#[derive(Clone)]
pub struct AppState {
    pub analytics: AnalyticsService,
    pub reports: ReportRegistry,
    pub hub: Hub,
}

impl AppState {
    /// Wire the services over one store and a fresh hub.
    pub fn new(store: SharedStore) -> Self {
        let hub = Hub::new();
        Self {
            analytics: AnalyticsService::new(store.clone(), Arc::new(hub.clone())),
            reports: ReportRegistry::new(store),
            hub,
        }
    }
}
