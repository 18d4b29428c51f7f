//! Harness for exercising the full router in handler tests.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

use crate::config::Config;
use crate::domain::calendar::{CalendarService, FixedClock};
use crate::domain::models::user::Credential;
use crate::domain::password::PasswordHasher;
use crate::storage::json::test_utils::TestEnvironment;
use crate::{create_router, AppState};

pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const CRON_SECRET: &str = "cron-secret";

pub struct TestApp {
    pub env: TestEnvironment,
    pub state: AppState,
    router: Router,
}

impl TestApp {
    /// 2024-01-16 09:00 UTC, which is 04:00 in New York
    pub fn new() -> Self {
        Self::at(Utc.with_ymd_and_hms(2024, 1, 16, 9, 0, 0).unwrap())
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        let env = TestEnvironment::new().unwrap();
        let config = Config {
            data_dir: env.base_path.clone(),
            admin_password: ADMIN_PASSWORD.to_string(),
            cron_secret: Some(CRON_SECRET.to_string()),
            session_secret: "test-session-secret".to_string(),
            ..Config::default()
        };
        let calendar = CalendarService::with_clock(config.timezone, Arc::new(FixedClock(now)));

        let state = AppState::new(&config, env.connection.clone(), calendar, PasswordHasher::fast());
        let router = create_router(state.clone(), &config);

        Self { env, state, router }
    }

    pub fn admin_token(&self) -> String {
        let admin = Credential::ConfiguredAdmin {
            username: "admin".to_string(),
        };
        self.state.auth_service.issue_session(&admin).unwrap().token
    }

    /// Send a request and return the status with the body parsed as JSON
    /// (`Value::Null` for an empty body).
    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
