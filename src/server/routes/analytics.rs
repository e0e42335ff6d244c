use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::analytics::{DashboardSummary, HISTORY_LIMIT};
use crate::model::DataPoint;
use crate::server::error::AppResult;
use crate::server::state::AppState;

use super::blocking;

/// `GET /api/analytics/dashboard`
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardSummary>> {
    let summary = blocking(move || state.analytics.dashboard_summary()).await?;
    Ok(Json(summary))
}

/// `POST /api/analytics/data`
///
/// Stores the point, pushes `data:new` to every viewer, returns it with 201.
pub async fn post_data(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataPoint>)> {
    let Json(body) = body?;
    let point = blocking(move || state.analytics.ingest(body)).await?;
    Ok((StatusCode::CREATED, Json(point)))
}

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Defaults to, and is capped at, 1000.
    pub limit: Option<usize>,
}

/// `GET /api/analytics/data/:datasetId`
pub async fn get_dataset_history(
    State(state): State<AppState>,
    Path(dataset_id): Path<String>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> AppResult<Json<Vec<DataPoint>>> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(HISTORY_LIMIT).min(HISTORY_LIMIT);
    let points = blocking(move || state.analytics.dataset_history(&dataset_id, limit)).await?;
    Ok(Json(points))
}
