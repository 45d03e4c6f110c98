//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domain::StopId;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stops", get(list_stops))
        .route("/stops/:id", get(get_stop))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Every registered stop, ordered by identifier.
async fn list_stops(State(state): State<AppState>) -> Json<StopsResponse> {
    let stops = state
        .registry
        .states()
        .await
        .into_iter()
        .map(StopView::from)
        .collect();

    Json(StopsResponse { stops })
}

/// One stop.
async fn get_stop(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StopView>, AppError> {
    let stop = StopId::parse(&id).map_err(|e| AppError::BadRequest {
        message: format!("Invalid stop id {id:?}: {e}"),
    })?;

    let handle = state
        .registry
        .get(&stop)
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("Stop {stop} is not registered"),
        })?;

    Ok(Json(StopView::from(handle.state().await)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
