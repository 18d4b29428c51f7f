//! Request extractors shared by the API modules.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    Json,
};
use serde::de::DeserializeOwned;

use super::error::AppError;
use crate::domain::auth_service::Session;
use crate::domain::models::user::AccountError;
use crate::AppState;

/// `Json<T>` whose rejection renders as an `{ "error" }` body
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    tracing::debug!("Rejected request body: {}", rejection.body_text());
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::BadRequest("Expected a JSON request body".to_string())
        }
        _ => AppError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text())),
    }
}

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Any valid session, admin or registered user
pub struct AuthenticatedSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AccountError::Unauthorized)?;
        let session = state
            .auth_service
            .verify_session(token)
            .await
            .map_err(|e| AppError::from_service(e, "Failed to verify session"))?;
        Ok(AuthenticatedSession(session))
    }
}

/// A session belonging to the configured admin
pub struct AdminSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthenticatedSession(session) = AuthenticatedSession::from_request_parts(parts, state).await?;
        if !session.is_admin() {
            tracing::warn!("{} attempted an admin-only action", session.username);
            return Err(AccountError::AdminRequired.into());
        }
        Ok(AdminSession(session))
    }
}
