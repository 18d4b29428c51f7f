//! # REST API Interface Layer
//!
//! JSON-over-HTTP endpoints for the recharge tracker, all mounted under
//! `/api`. This layer handles:
//! - request/response serialization through the `shared` DTOs
//! - bearer-token session and cron checks
//! - translation of domain errors to status codes with `{ "error" }` bodies
//!
//! Handlers stay thin: they map DTOs to domain commands and back, and leave
//! every business rule to the domain services.

pub mod admin_apis;
pub mod cron_apis;
pub mod error;
pub mod extract;
pub mod health_apis;
pub mod history_apis;
pub mod mappers;
pub mod request_apis;

#[cfg(test)]
pub mod test_support;

use axum::{
    http::{header::ALLOW, StatusCode},
    response::{IntoResponse, Response},
    Router,
};

use crate::AppState;
pub use error::AppError;

/// Every `/api` route, with a JSON 404 for unknown paths
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/health", health_apis::router())
        .nest("/requests", request_apis::router())
        .nest("/history", history_apis::router())
        .nest("/cron", cron_apis::router())
        .nest("/admin", admin_apis::router())
        .fallback(health_apis::api_not_found)
}

/// Give axum's bare 405 responses the same JSON body as every other error
pub async fn json_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(ALLOW).cloned();
    let mut json_response = AppError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        json_response.headers_mut().insert(ALLOW, allow);
    }
    json_response
}
