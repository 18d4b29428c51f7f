use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::models::history::HistoryEntry;
use crate::storage::HistoryStorage;

pub const DEFAULT_RETENTION_DAYS: usize = 15;

/// Insert `entry` into `history` and restore the list invariants: one entry
/// per date, newest first, at most `retention` entries.
pub fn record_entry(history: Vec<HistoryEntry>, entry: HistoryEntry, retention: usize) -> Vec<HistoryEntry> {
    let mut entries = history;
    entries.push(entry);
    normalize(entries, retention)
}

fn normalize(mut entries: Vec<HistoryEntry>, retention: usize) -> Vec<HistoryEntry> {
    // Stable sort keeps older records first within a date, so the merged
    // request list stays in archive order.
    entries.sort_by(|a, b| b.date.cmp(&a.date));

    let mut merged: Vec<HistoryEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        match merged.last_mut() {
            Some(last) if last.date == entry.date => last.absorb(entry),
            _ => merged.push(entry),
        }
    }

    merged.truncate(retention);
    merged
}

#[derive(Clone)]
pub struct HistoryService {
    history_storage: Arc<dyn HistoryStorage>,
    retention: usize,
}

impl HistoryService {
    pub fn new(history_storage: Arc<dyn HistoryStorage>, retention: usize) -> Self {
        Self {
            history_storage,
            retention,
        }
    }

    /// History newest first. Lists written by older versions may be unsorted
    /// or over-long; they are normalized on the way out.
    pub async fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        let entries = self.history_storage.list_history().await?;
        debug!("Loaded {} history entries", entries.len());
        Ok(normalize(entries, self.retention))
    }

    /// Record a closed day and persist the trimmed list
    pub async fn append_entry(&self, entry: HistoryEntry) -> Result<Vec<HistoryEntry>> {
        let date = entry.date;
        let history = self.history_storage.list_history().await?;
        let updated = record_entry(history, entry, self.retention);

        self.history_storage.replace_history(&updated).await?;
        info!("Archived {} into history ({} entries kept)", date, updated.len());
        Ok(updated)
    }
}
