//! # Scheduled trigger for the History Roller
//!
//! An external scheduler calls this endpoint with `Authorization: Bearer
//! <CRON_SECRET>`. The call is a no-op outside the configured local hours
//! and after the day has already been rolled over.

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    response::Json,
    routing::post,
    Router,
};
use tracing::{info, warn};

use super::error::AppError;
use super::mappers::history_mapper::HistoryMapper;
use crate::domain::calendar::CalendarService;
use crate::domain::commands::rollover::RolloverOutcome;
use crate::AppState;
use shared::{DailyResetResponse, DailyResetStatus};

pub fn router() -> Router<AppState> {
    Router::new().route("/daily-reset", post(daily_reset))
}

pub async fn daily_reset(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DailyResetResponse>, AppError> {
    info!("POST /api/cron/daily-reset");

    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if let Err(e) = state.auth_service.verify_cron_token(authorization) {
        warn!("Rejected cron trigger");
        return Err(e.into());
    }

    let outcome = state
        .rollover_service
        .run_scheduled()
        .await
        .map_err(|e| AppError::from_service(e, "Daily reset failed"))?;

    let local_hour = state.calendar_service.local_hour();
    let timestamp = state.calendar_service.now_utc().to_rfc3339();
    let response = match outcome {
        RolloverOutcome::Skipped { local_hour } => DailyResetResponse {
            success: true,
            status: DailyResetStatus::Skipped,
            message: format!("Not reset time (local hour {})", local_hour),
            local_hour,
            date: None,
            archived: None,
            timestamp,
        },
        RolloverOutcome::AlreadyReset { date } => DailyResetResponse {
            success: true,
            status: DailyResetStatus::AlreadyDone,
            message: "Already reset today".to_string(),
            local_hour,
            date: Some(CalendarService::format_day(date)),
            archived: None,
            timestamp,
        },
        RolloverOutcome::Completed { date, archived } => DailyResetResponse {
            success: true,
            status: DailyResetStatus::Completed,
            message: match &archived {
                Some(entry) => format!("Daily reset completed, archived {} requests", entry.total_requests),
                None => "Daily reset completed, nothing to archive".to_string(),
            },
            local_hour,
            date: Some(CalendarService::format_day(date)),
            archived: archived.map(HistoryMapper::to_dto),
            timestamp,
        },
    };

    Ok(Json(response))
}
