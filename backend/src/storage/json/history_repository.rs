//! # JSON History Repository
//!
//! Stores closed days in `phone-recharge-history.json` as an array of
//! entries. Ordering and retention are the domain's job; this repository
//! stores whatever list it is given.
//!
//! Entries whose date label cannot be read are hidden from listings but never
//! lost: every replace carries them over, unchanged, after the given list.

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use super::connection::{JsonConnection, HISTORY_KEY};
use crate::domain::calendar::CalendarService;
use crate::domain::models::history::HistoryEntry;
use crate::io::rest::mappers::history_mapper::HistoryMapper;
use crate::storage::HistoryStorage;

#[derive(Clone)]
pub struct HistoryRepository {
    connection: JsonConnection,
}

impl HistoryRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }
}

impl HistoryRepository {
    fn read_stored(&self) -> Result<Vec<shared::HistoryEntry>> {
        Ok(self.connection.read_blob(HISTORY_KEY)?.unwrap_or_default())
    }
}

#[async_trait]
impl HistoryStorage for HistoryRepository {
    async fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        let entries = self
            .read_stored()?
            .into_iter()
            .filter_map(|entry| {
                let date = entry.date.clone();
                let mapped = HistoryMapper::to_domain(entry);
                if mapped.is_none() {
                    warn!("Hiding history entry with unreadable date '{}'", date);
                }
                mapped
            })
            .collect();

        Ok(entries)
    }

    async fn replace_history(&self, entries: &[HistoryEntry]) -> Result<()> {
        let unreadable: Vec<shared::HistoryEntry> = self
            .read_stored()?
            .into_iter()
            .filter(|entry| CalendarService::parse_day(&entry.date).is_none())
            .collect();
        if !unreadable.is_empty() {
            warn!(
                "Keeping {} history entries with unreadable dates as stored",
                unreadable.len()
            );
        }

        let stored: Vec<shared::HistoryEntry> = entries
            .iter()
            .cloned()
            .map(HistoryMapper::to_dto)
            .chain(unreadable)
            .collect();
        self.connection.write_blob(HISTORY_KEY, &stored)
    }
}
