//! # Recharge Tracker Backend
//!
//! Tracks phone-recharge requests for a single shop: customers submit
//! requests, the dashboard completes or deletes them, and once a day the
//! current bucket is closed into a short rolling history.
//!
//! ## Architecture
//!
//! - **storage**: named JSON blobs on disk behind async storage traits
//! - **domain**: request store, History Roller, Credential Check, accounts
//! - **io**: REST API (axum) translating DTOs from `shared`
//! - **jobs**: optional in-process rollover scheduler
//!
//! This module wires the layers together into an [`AppState`] and the
//! application router.

pub mod config;
pub mod domain;
pub mod io;
pub mod jobs;
pub mod storage;

use anyhow::Result;
use axum::{http::HeaderValue, middleware, Router};
use chrono::Duration;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use config::Config;
use domain::{
    AdminCredentials, AuthService, CalendarService, HistoryService, PasswordHasher, RequestService,
    RolloverService, SessionSettings, UserService,
};
use storage::{DayBucketRepository, HistoryRepository, JsonConnection, UserRepository};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub calendar_service: CalendarService,
    pub request_service: RequestService,
    pub history_service: HistoryService,
    pub rollover_service: RolloverService,
    pub auth_service: AuthService,
    pub user_service: UserService,
}

impl AppState {
    pub fn new(config: &Config, connection: JsonConnection, calendar: CalendarService, hasher: PasswordHasher) -> Self {
        let buckets = Arc::new(DayBucketRepository::new(connection.clone()));
        let users = Arc::new(UserRepository::new(connection.clone()));

        let history_service = HistoryService::new(
            Arc::new(HistoryRepository::new(connection)),
            config.history_retention_days,
        );
        let rollover_service = RolloverService::new(
            buckets.clone(),
            history_service.clone(),
            calendar.clone(),
            config.rollover_hours.clone(),
        );
        let auth_service = AuthService::new(
            AdminCredentials {
                username: config.admin_username.clone(),
                password: config.admin_password.clone(),
            },
            users.clone(),
            hasher,
            SessionSettings {
                secret: config.session_secret.clone(),
                ttl: Duration::hours(config.session_ttl_hours),
            },
            config.cron_secret.clone(),
            calendar.clone(),
        );
        let user_service = UserService::new(users, hasher, config.admin_username.clone(), calendar.clone());

        Self {
            request_service: RequestService::new(buckets, calendar.clone()),
            calendar_service: calendar,
            history_service,
            rollover_service,
            auth_service,
            user_service,
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    let connection = JsonConnection::new(&config.data_dir)?;
    info!("Data directory: {}", connection.base_directory().display());

    info!("Business timezone: {}", config.timezone);
    let calendar = CalendarService::new(config.timezone);

    Ok(AppState::new(config, connection, calendar, PasswordHasher::default()))
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = match config.cors_origin.as_deref() {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(e) => {
                warn!("Ignoring invalid CORS_ORIGIN '{}': {}", origin, e);
                AllowOrigin::any()
            }
        },
        None => AllowOrigin::any(),
    };

    CorsLayer::new().allow_origin(origin).allow_methods(Any).allow_headers(Any)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &Config) -> Router {
    let mut app = Router::new().nest("/api", io::rest::api_router());

    // Everything outside /api is the built dashboard, with client-side routing
    if let Some(static_dir) = &config.static_dir {
        info!("Serving static files from {}", static_dir.display());
        let index = ServeFile::new(static_dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(static_dir).fallback(index));
    }

    app.layer(middleware::map_response(io::rest::json_method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .with_state(app_state)
}
