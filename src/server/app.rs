//! Axum application builder.

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::routes::{analytics, health, reports, ws};
use super::state::AppState;
use super::ServerError;

/// Create the application with all routes.
///
/// `cors_origin` is the single browser origin allowed to call the API, or
/// `*` for any.
pub fn create_app(state: AppState, cors_origin: &str) -> Result<Router, ServerError> {
    let api = Router::new()
        .route("/api/analytics/dashboard", get(analytics::get_dashboard))
        .route("/api/analytics/data", axum::routing::post(analytics::post_data))
        .route(
            "/api/analytics/data/:dataset_id",
            get(analytics::get_dataset_history),
        )
        .route(
            "/api/reports",
            get(reports::list_reports).post(reports::post_report),
        )
        .route("/api/reports/:id", get(reports::get_report))
        .route("/health", get(health::health))
        .method_not_allowed_fallback(health::method_not_allowed)
        .fallback(health::not_found)
        .layer(CompressionLayer::new());

    Ok(Router::new()
        .route("/ws", get(ws::ws_handler))
        .merge(api)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(cors_layer(cors_origin)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn cors_layer(origin: &str) -> Result<CorsLayer, ServerError> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origin == "*" {
        return Ok(layer.allow_origin(Any));
    }

    let origin = HeaderValue::from_str(origin)
        .map_err(|_| ServerError::InvalidOrigin(origin.to_string()))?;
    Ok(layer.allow_origin(origin))
}
