use axum::extract::State;
use axum::http::{Method, Uri};
use axum::Json;
use serde::Serialize;

use crate::server::error::AppError;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Realtime viewers currently connected.
    pub connections: usize,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        connections: state.hub.connection_count(),
    })
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}

/// Fallback for a known route called with an unsupported method.
pub async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::MethodNotAllowed(format!("{method} not allowed on {}", uri.path()))
}
