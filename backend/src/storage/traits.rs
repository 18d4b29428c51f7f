//! # Storage Traits
//!
//! Storage abstractions used by the domain layer, so services can run against
//! any backend that can hold the three blobs.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::history::HistoryEntry;
use crate::domain::models::request::DayBucket;
use crate::domain::models::user::UserAccount;

/// The current-day request bucket
#[async_trait]
pub trait DayBucketStorage: Send + Sync {
    /// Load the bucket; an absent store yields an empty, undated bucket
    async fn get_day_bucket(&self) -> Result<DayBucket>;

    /// Replace the bucket wholesale
    async fn set_day_bucket(&self, bucket: &DayBucket) -> Result<()>;
}

/// Closed-day history
#[async_trait]
pub trait HistoryStorage: Send + Sync {
    /// Load every stored entry in stored order
    async fn list_history(&self) -> Result<Vec<HistoryEntry>>;

    /// Replace the full history list
    async fn replace_history(&self, entries: &[HistoryEntry]) -> Result<()>;
}

/// Registered accounts
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// List all accounts in registration order
    async fn list_users(&self) -> Result<Vec<UserAccount>>;

    /// Find an account by exact username
    async fn get_user(&self, username: &str) -> Result<Option<UserAccount>>;

    /// Store a new account; fails if the username is already taken
    async fn store_user(&self, user: &UserAccount) -> Result<()>;

    /// Replace an existing account; fails if it does not exist
    async fn update_user(&self, user: &UserAccount) -> Result<()>;

    /// Delete an account by exact username.
    /// Returns true if an account was removed
    async fn delete_user(&self, username: &str) -> Result<bool>;
}
