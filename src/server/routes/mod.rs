//! Route handlers.
//!
//! - [`analytics`]: dashboard summary, ingest, dataset history
//! - [`reports`]: report registry
//! - [`ws`]: realtime channel upgrade
//! - [`health`]: liveness and unknown-route fallback

pub mod analytics;
pub mod health;
pub mod reports;
pub mod ws;

use crate::server::error::{AppError, AppResult};

/// Run a store-bound call on the blocking pool so a slow store only delays
/// the request that issued it.
pub(crate) async fn blocking<T, E, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(work).await?.map_err(Into::into)
}
