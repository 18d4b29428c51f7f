//! # REST API for the Credential Check and account administration
//!
//! `login` and `session` are open to every account; registration and the
//! `/users` endpoints require the configured admin.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use tracing::info;

use super::error::AppError;
use super::extract::{AdminSession, AuthenticatedSession, JsonBody};
use super::mappers::user_mapper::UserMapper;
use crate::domain::auth_service::Session;
use crate::domain::commands::accounts::{LoginCommand, RegisterCommand, ResetPasswordCommand};
use crate::domain::models::user::Role;
use crate::AppState;
use shared::{
    DeleteUserRequest, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest, SessionInfoResponse,
    SessionRole, SuccessResponse, UserListResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/session", get(session_info))
        .route("/register", post(register))
        .route("/users", get(list_users).delete(delete_user))
        .route("/users/password", put(reset_password))
}

fn session_role(role: Role) -> SessionRole {
    match role {
        Role::Admin => SessionRole::Admin,
        Role::User => SessionRole::User,
    }
}

fn login_response(session: Session) -> LoginResponse {
    LoginResponse {
        success: true,
        token: session.token,
        username: session.username,
        role: session_role(session.role),
        expires_at: session.expires_at.to_rfc3339(),
    }
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    info!("POST /api/admin/login - username: {}", request.username);

    let session = state
        .auth_service
        .login(LoginCommand {
            username: request.username,
            password: request.password,
        })
        .await
        .map_err(|e| AppError::from_service(e, "Login failed"))?;

    Ok(Json(login_response(session)))
}

/// Who the bearer of the current token is
pub async fn session_info(AuthenticatedSession(session): AuthenticatedSession) -> Json<SessionInfoResponse> {
    Json(SessionInfoResponse {
        username: session.username,
        role: session_role(session.role),
        expires_at: session.expires_at.to_rfc3339(),
    })
}

pub async fn register(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<SuccessResponse>), AppError> {
    info!("POST /api/admin/register by {} - username: {}", admin.username, request.username);

    let account = state
        .user_service
        .register(RegisterCommand {
            username: request.username,
            password: request.password,
        })
        .await
        .map_err(|e| AppError::from_service(e, "Failed to create account"))?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_message(format!("Account {} created", account.username))),
    ))
}

pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<UserListResponse>, AppError> {
    info!("GET /api/admin/users");

    let users = state
        .user_service
        .list_users()
        .await
        .map_err(|e| AppError::from_service(e, "Failed to fetch users"))?;

    Ok(Json(UserListResponse {
        users: users.iter().map(UserMapper::to_summary).collect(),
    }))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    JsonBody(request): JsonBody<DeleteUserRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    info!("DELETE /api/admin/users by {} - username: {}", admin.username, request.username);

    state
        .user_service
        .delete_user(&request.username)
        .await
        .map_err(|e| AppError::from_service(e, "Failed to delete user"))?;

    Ok(Json(SuccessResponse::with_message(format!("Account {} deleted", request.username))))
}

pub async fn reset_password(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    JsonBody(request): JsonBody<ResetPasswordRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    info!("PUT /api/admin/users/password by {} - username: {}", admin.username, request.username);

    let account = state
        .user_service
        .reset_password(ResetPasswordCommand {
            username: request.username,
            new_password: request.new_password,
        })
        .await
        .map_err(|e| AppError::from_service(e, "Failed to reset password"))?;

    Ok(Json(SuccessResponse::with_message(format!(
        "Password updated for {}",
        account.username
    ))))
}
