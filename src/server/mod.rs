//! HTTP and WebSocket surface.
//!
//! ## Routes
//!
//! - `GET  /api/analytics/dashboard` - summary of totals and latest points
//! - `POST /api/analytics/data` - ingest a data point (201)
//! - `GET  /api/analytics/data/:datasetId` - dataset history, newest first
//! - `POST /api/reports` - create a report (201)
//! - `GET  /api/reports` - list reports
//! - `GET  /api/reports/:id` - one report, or `null`
//! - `GET  /ws` - realtime channel
//! - `GET  /health` - liveness and connected viewer count
//!
//! Failures are JSON `{ "error": "<message>" }`.

mod app;
mod error;
mod routes;
mod state;

pub use app::create_app;
pub use error::{AppError, AppResult};
pub use state::AppState;

use tracing::info;

use crate::config::Config;
use crate::store::{open_store, StoreError};

/// Startup or shutdown failure of the server process.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CORS origin: {0}")]
    InvalidOrigin(String),
}

/// Run the server until Ctrl-C / SIGTERM.
///
/// Opens the store before binding. On shutdown, closes every realtime
/// connection, then flushes the store.
pub async fn serve(config: Config) -> Result<(), ServerError> {
    let store = open_store(&config.store_url)?;
    info!(store_url = %config.store_url, "store opened");

    let state = AppState::new(store.clone());
    let app = create_app(state.clone(), &config.cors_origin)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, cors_origin = %config.cors_origin, "InsightHub running");

    let hub = state.hub.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!(connections = hub.connection_count(), "shutting down");
            hub.close_all();
        })
        .await?;

    store.flush()?;
    info!("store flushed, bye");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
