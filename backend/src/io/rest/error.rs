//! Translation of domain failures into HTTP responses.
//!
//! Every error body has the shape `{ "error": "<message>" }`. Validation and
//! auth messages are passed through; anything unexpected becomes a 500 with
//! a fixed message and the details go to the log only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::error;

use crate::domain::models::request::RequestError;
use crate::domain::models::user::AccountError;
use shared::ErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("{message}")]
    Internal {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Map a service error, using `message` if it turns out to be internal
    pub fn from_service(err: anyhow::Error, message: &'static str) -> Self {
        if let Some(e) = err.downcast_ref::<RequestError>() {
            return Self::from(e);
        }
        if let Some(e) = err.downcast_ref::<AccountError>() {
            return Self::from(e);
        }
        AppError::Internal { message, source: err }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<&RequestError> for AppError {
    fn from(e: &RequestError) -> Self {
        match e {
            RequestError::NotFound(_) => AppError::NotFound(e.to_string()),
            RequestError::IdsExhausted => AppError::Conflict(e.to_string()),
            RequestError::MissingFields
            | RequestError::PhoneNumberTooShort
            | RequestError::InvalidAmount
            | RequestError::InvalidRequestAmount(_)
            | RequestError::DuplicateId(_)
            | RequestError::InvalidDate(_) => AppError::BadRequest(e.to_string()),
        }
    }
}

impl From<&AccountError> for AppError {
    fn from(e: &AccountError) -> Self {
        match e {
            AccountError::MissingFields
            | AccountError::UsernameRequired
            | AccountError::UsernameTooShort
            | AccountError::PasswordTooShort => AppError::BadRequest(e.to_string()),
            AccountError::UsernameTaken => AppError::Conflict(e.to_string()),
            AccountError::NotFound => AppError::NotFound(e.to_string()),
            AccountError::InvalidCredentials
            | AccountError::Unauthorized
            | AccountError::AdminRequired => AppError::Unauthorized(e.to_string()),
        }
    }
}

impl From<AccountError> for AppError {
    fn from(e: AccountError) -> Self {
        Self::from(&e)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::from_service(err, "Internal server error")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal { message, source } = &self {
            error!("{}: {:#}", message, source);
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
