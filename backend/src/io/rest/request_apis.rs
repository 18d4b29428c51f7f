//! # REST API for the current day's requests
//!
//! Customers submit without a session; everything else is dashboard-only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch, post},
    Router,
};
use tracing::info;

use super::error::AppError;
use super::extract::{AuthenticatedSession, JsonBody};
use super::mappers::request_mapper::{DayBucketMapper, RequestMapper};
use crate::domain::calendar::CalendarService;
use crate::domain::commands::requests::{DeleteRequestsCommand, SubmitRequestCommand};
use crate::AppState;
use shared::{
    DayBucket, DaySummaryResponse, DeleteRequestsRequest, DeleteRequestsResponse, SubmitRechargeRequest,
    SubmitRechargeResponse, SuccessResponse, ToggleCompletionResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_requests).post(replace_requests).delete(delete_requests))
        .route("/submit", post(submit_request))
        .route("/summary", get(get_day_summary))
        .route("/:id/toggle", patch(toggle_request))
}

/// Customer submission
pub async fn submit_request(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SubmitRechargeRequest>,
) -> Result<(StatusCode, Json<SubmitRechargeResponse>), AppError> {
    info!("POST /api/requests/submit");

    let command = SubmitRequestCommand {
        phone_number: request.phone_number,
        amount: request.amount,
        name: request.name,
    };
    let created = state
        .request_service
        .submit_request(command)
        .await
        .map_err(|e| AppError::from_service(e, "Failed to submit request"))?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitRechargeResponse {
            request: RequestMapper::to_dto(created),
            success_message: "Request submitted".to_string(),
        }),
    ))
}

pub async fn get_requests(
    State(state): State<AppState>,
    _session: AuthenticatedSession,
) -> Result<Json<DayBucket>, AppError> {
    info!("GET /api/requests");

    let bucket = state
        .request_service
        .get_day_bucket()
        .await
        .map_err(|e| AppError::from_service(e, "Failed to load requests"))?;
    Ok(Json(DayBucketMapper::to_dto(bucket)))
}

/// Wholesale replacement of the day bucket
pub async fn replace_requests(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    JsonBody(bucket): JsonBody<DayBucket>,
) -> Result<Json<SuccessResponse>, AppError> {
    info!("POST /api/requests by {} ({} requests)", session.username, bucket.requests.len());

    let bucket = DayBucketMapper::to_domain_checked(bucket).map_err(|e| AppError::from(&e))?;
    state
        .request_service
        .replace_day_bucket(bucket)
        .await
        .map_err(|e| AppError::from_service(e, "Failed to save requests"))?;

    Ok(Json(SuccessResponse::ok()))
}

pub async fn get_day_summary(
    State(state): State<AppState>,
    _session: AuthenticatedSession,
) -> Result<Json<DaySummaryResponse>, AppError> {
    info!("GET /api/requests/summary");

    let summary = state
        .request_service
        .day_summary()
        .await
        .map_err(|e| AppError::from_service(e, "Failed to load summary"))?;

    Ok(Json(DaySummaryResponse {
        date: summary.date.map(CalendarService::format_day).unwrap_or_default(),
        total_sold: summary.total_sold,
        total_requests: summary.total_requests,
        completed_count: summary.completed_count,
        pending_count: summary.pending_count,
    }))
}

pub async fn toggle_request(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<String>,
) -> Result<Json<ToggleCompletionResponse>, AppError> {
    info!("PATCH /api/requests/{}/toggle by {}", id, session.username);

    let id: u64 = id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid request id: {}", id)))?;
    let updated = state
        .request_service
        .toggle_completion(id)
        .await
        .map_err(|e| AppError::from_service(e, "Failed to update request"))?;

    Ok(Json(ToggleCompletionResponse {
        request: RequestMapper::to_dto(updated),
    }))
}

pub async fn delete_requests(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    JsonBody(request): JsonBody<DeleteRequestsRequest>,
) -> Result<Json<DeleteRequestsResponse>, AppError> {
    info!("DELETE /api/requests by {} - ids: {:?}", session.username, request.ids);

    if request.ids.is_empty() {
        return Err(AppError::BadRequest("No request ids given".to_string()));
    }

    let result = state
        .request_service
        .delete_requests(DeleteRequestsCommand { ids: request.ids })
        .await
        .map_err(|e| AppError::from_service(e, "Failed to delete requests"))?;

    Ok(Json(DeleteRequestsResponse {
        deleted_count: result.deleted_count,
        not_found_ids: result.not_found_ids,
        success_message: result.success_message,
    }))
}
