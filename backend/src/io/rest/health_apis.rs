use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};

use super::error::AppError;
use crate::AppState;
use shared::HealthResponse;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health))
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            timestamp: state.calendar_service.now_utc().to_rfc3339(),
        }),
    )
}

/// JSON 404 for anything under `/api` without a route
pub async fn api_not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}
