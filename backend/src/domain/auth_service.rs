//! Credential check and session tokens.
//!
//! Login resolves to a [`Credential`] in a fixed order: the configured admin
//! first, then registered accounts. A successful login is turned into a
//! signed HS256 token carrying the username, role and expiry; protected
//! routes verify that token instead of trusting client-side state.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::calendar::CalendarService;
use crate::domain::commands::accounts::LoginCommand;
use crate::domain::models::user::{AccountError, Credential, Role};
use crate::domain::password::PasswordHasher;
use crate::storage::UserStorage;

/// Superuser credentials taken from configuration
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

/// Signing material and lifetime for session tokens
#[derive(Clone)]
pub struct SessionSettings {
    pub secret: String,
    pub ttl: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// A verified (or freshly issued) session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Clone)]
pub struct AuthService {
    admin: AdminCredentials,
    user_storage: Arc<dyn UserStorage>,
    hasher: PasswordHasher,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl: Duration,
    cron_secret: Option<String>,
    calendar: CalendarService,
}

impl AuthService {
    pub fn new(
        admin: AdminCredentials,
        user_storage: Arc<dyn UserStorage>,
        hasher: PasswordHasher,
        session: SessionSettings,
        cron_secret: Option<String>,
        calendar: CalendarService,
    ) -> Self {
        Self {
            admin,
            user_storage,
            hasher,
            encoding_key: EncodingKey::from_secret(session.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(session.secret.as_bytes()),
            session_ttl: session.ttl,
            cron_secret: cron_secret.filter(|s| !s.is_empty()),
            calendar,
        }
    }

    /// Resolve a username/password pair to a credential
    pub async fn authenticate(&self, command: &LoginCommand) -> Result<Credential> {
        if command.username.is_empty() || command.password.is_empty() {
            return Err(AccountError::MissingFields.into());
        }

        if command.username == self.admin.username && command.password == self.admin.password {
            return Ok(Credential::ConfiguredAdmin {
                username: self.admin.username.clone(),
            });
        }

        if let Some(account) = self.user_storage.get_user(&command.username).await? {
            if self.hasher.verify(&account.password_hash, &command.password).await? {
                return Ok(Credential::RegisteredUser(account));
            }
        }

        Err(AccountError::InvalidCredentials.into())
    }

    /// Authenticate and issue a session in one step
    pub async fn login(&self, command: LoginCommand) -> Result<Session> {
        info!("Login attempt for {}", command.username);
        match self.authenticate(&command).await {
            Ok(credential) => self.issue_session(&credential),
            Err(e) => {
                warn!("Login failed for {}: {}", command.username, e);
                Err(e)
            }
        }
    }

    pub fn issue_session(&self, credential: &Credential) -> Result<Session> {
        let issued_at = self.calendar.now_utc();
        let expires_at = issued_at + self.session_ttl;
        let claims = Claims {
            sub: credential.username().to_string(),
            role: credential.role(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(Session {
            token,
            username: claims.sub,
            role: claims.role,
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or(expires_at),
        })
    }

    /// Check signature and expiry. Sessions of deleted accounts are rejected.
    pub async fn verify_session(&self, token: &str) -> Result<Session> {
        // Expiry is checked against the service clock rather than the
        // library's wall clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let claims = match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!("Rejected session token: {}", e);
                return Err(AccountError::Unauthorized.into());
            }
        };

        if claims.exp <= self.calendar.now_utc().timestamp() {
            debug!("Session for {} expired", claims.sub);
            return Err(AccountError::Unauthorized.into());
        }

        if claims.role == Role::User && self.user_storage.get_user(&claims.sub).await?.is_none() {
            debug!("Session for removed account {}", claims.sub);
            return Err(AccountError::Unauthorized.into());
        }

        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(AccountError::Unauthorized)?;
        Ok(Session {
            token: token.to_string(),
            username: claims.sub,
            role: claims.role,
            expires_at,
        })
    }

    /// Check an `Authorization` header value against the cron secret
    pub fn verify_cron_token(&self, authorization: Option<&str>) -> Result<(), AccountError> {
        let Some(secret) = self.cron_secret.as_deref() else {
            warn!("Cron trigger rejected: no cron secret configured");
            return Err(AccountError::Unauthorized);
        };

        match authorization.and_then(|h| h.strip_prefix("Bearer ")) {
            Some(token) if token == secret => Ok(()),
            _ => Err(AccountError::Unauthorized),
        }
    }
}
