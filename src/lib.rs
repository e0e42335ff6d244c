//! InsightHub - real-time analytics dashboard backend.
//!
//! Data points are ingested over HTTP, stored in a [`store::DocumentStore`],
//! and pushed to every connected viewer over a WebSocket channel. Reports
//! are named chart definitions over one or more datasets.

extern crate self as insighthub;

pub mod analytics;
#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod model;
pub mod realtime;
pub mod reports;
pub mod server;
pub mod store;

pub use analytics::{AnalyticsService, DashboardSummary};
pub use config::{Config, DashboardConfig};
pub use model::{ChartType, DataPoint, Report};
pub use realtime::Hub;
pub use reports::ReportRegistry;
pub use store::{open_store, Document, DocumentStore, SharedStore, StoreError};

pub use insighthub_macros::Document;
