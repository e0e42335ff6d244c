use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::model::Report;
use crate::server::error::AppResult;
use crate::server::state::AppState;

use super::blocking;

/// `POST /api/reports`
pub async fn post_report(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Report>)> {
    let Json(body) = body?;
    let report = blocking(move || state.reports.create_report(body)).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// `GET /api/reports`
pub async fn list_reports(State(state): State<AppState>) -> AppResult<Json<Vec<Report>>> {
    let reports = blocking(move || state.reports.list_reports()).await?;
    Ok(Json(reports))
}

/// `GET /api/reports/:id`
///
/// A missing id answers 200 with a `null` body, which existing dashboards
/// rely on.
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Option<Report>>> {
    let report = blocking(move || state.reports.get_report(&id)).await?;
    Ok(Json(report))
}
