//! # JSON User Repository
//!
//! Stores registered accounts in `phone-recharge-users.json`:
//!
//! ```json
//! [
//!   { "username": "clerk", "password": "$argon2id$...",
//!     "createdAt": "2024-01-01T12:00:00Z" }
//! ]
//! ```
//!
//! The hash keeps the historical field name `password`. All operations are a
//! read-modify-write of the whole list.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::connection::{JsonConnection, USERS_KEY};
use crate::domain::models::user::UserAccount;
use crate::storage::UserStorage;

/// On-disk account record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    username: String,
    #[serde(rename = "password")]
    password_hash: String,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password_updated_at: Option<DateTime<Utc>>,
}

impl From<StoredUser> for UserAccount {
    fn from(stored: StoredUser) -> Self {
        Self {
            username: stored.username,
            password_hash: stored.password_hash,
            created_at: stored.created_at,
            password_updated_at: stored.password_updated_at,
        }
    }
}

impl From<&UserAccount> for StoredUser {
    fn from(user: &UserAccount) -> Self {
        Self {
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            created_at: user.created_at,
            password_updated_at: user.password_updated_at,
        }
    }
}

#[derive(Clone)]
pub struct UserRepository {
    connection: JsonConnection,
}

impl UserRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn load(&self) -> Result<Vec<StoredUser>> {
        Ok(self.connection.read_blob(USERS_KEY)?.unwrap_or_default())
    }

    fn save(&self, users: &[StoredUser]) -> Result<()> {
        self.connection.write_blob(USERS_KEY, users)
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn list_users(&self) -> Result<Vec<UserAccount>> {
        let users: Vec<UserAccount> = self.load()?.into_iter().map(UserAccount::from).collect();
        debug!("Loaded {} registered users", users.len());
        Ok(users)
    }

    async fn get_user(&self, username: &str) -> Result<Option<UserAccount>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|u| u.username == username)
            .map(UserAccount::from))
    }

    async fn store_user(&self, user: &UserAccount) -> Result<()> {
        let mut users = self.load()?;
        if users.iter().any(|u| u.username == user.username) {
            return Err(anyhow!("User already exists: {}", user.username));
        }

        users.push(StoredUser::from(user));
        self.save(&users)?;
        info!("Stored user {}", user.username);
        Ok(())
    }

    async fn update_user(&self, user: &UserAccount) -> Result<()> {
        let mut users = self.load()?;
        let slot = users
            .iter_mut()
            .find(|u| u.username == user.username)
            .ok_or_else(|| anyhow!("User not found: {}", user.username))?;

        *slot = StoredUser::from(user);
        self.save(&users)
    }

    async fn delete_user(&self, username: &str) -> Result<bool> {
        let mut users = self.load()?;
        let before = users.len();
        users.retain(|u| u.username != username);

        if users.len() == before {
            return Ok(false);
        }

        self.save(&users)?;
        info!("Deleted user {}", username);
        Ok(true)
    }
}
