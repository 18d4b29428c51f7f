use axum::{extract::State, response::Json, routing::get, Router};
use tracing::info;

use super::error::AppError;
use super::extract::AuthenticatedSession;
use super::mappers::history_mapper::HistoryMapper;
use crate::AppState;
use shared::HistoryResponse;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_history))
}

/// Closed days, newest first
pub async fn get_history(
    State(state): State<AppState>,
    _session: AuthenticatedSession,
) -> Result<Json<HistoryResponse>, AppError> {
    info!("GET /api/history");

    let entries = state
        .history_service
        .list_history()
        .await
        .map_err(|e| AppError::from_service(e, "Failed to load history"))?;

    Ok(Json(HistoryResponse {
        history: entries.into_iter().map(HistoryMapper::to_dto).collect(),
    }))
}
