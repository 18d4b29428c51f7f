/// Test utilities for storage and service tests
///
/// `TestEnvironment` owns a temporary data directory that is removed when
/// the environment is dropped, even if the test panics.
use anyhow::Result;
use chrono::{NaiveDate, TimeZone, Utc};
use std::path::PathBuf;
use tempfile::TempDir;

use super::connection::JsonConnection;
use crate::domain::models::history::{HistoryEntry, HistorySnapshot};
use crate::domain::models::user::UserAccount;

pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub connection: JsonConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::with_prefix("recharge_tracker_")?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = JsonConnection::new(&base_path)?;

        Ok(Self {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }
}

/// Build a history entry for `date` with one snapshot per amount
pub fn sample_history_entry(date: NaiveDate, amounts: &[f64]) -> HistoryEntry {
    let requests: Vec<HistorySnapshot> = amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| HistorySnapshot {
            id: i as u64 + 1,
            phone_number: format!("555000000{}", i),
            amount: *amount,
            timestamp: "10:00:00 AM".to_string(),
            completed: true,
        })
        .collect();

    HistoryEntry {
        date,
        total_sold: amounts.iter().sum(),
        total_requests: amounts.len(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
        requests,
    }
}

/// Account with a placeholder hash, for storage-level tests
pub fn sample_account(username: &str) -> UserAccount {
    UserAccount {
        username: username.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        password_updated_at: None,
    }
}
