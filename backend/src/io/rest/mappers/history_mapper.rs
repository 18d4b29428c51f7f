//! Conversions between shared history DTOs and domain history entries.

use chrono::{DateTime, NaiveTime, Utc};
use tracing::warn;

use crate::domain::calendar::CalendarService;
use crate::domain::models::history::{HistoryEntry as DomainEntry, HistorySnapshot};
use shared::{HistoryEntry as SharedEntry, HistoryRequest as SharedSnapshot};

pub struct HistoryMapper;

impl HistoryMapper {
    /// Returns `None` when the entry's date label cannot be read.
    ///
    /// An unreadable creation timestamp falls back to midnight of the entry's
    /// own date.
    pub fn to_domain(dto: SharedEntry) -> Option<DomainEntry> {
        let date = CalendarService::parse_day(&dto.date)?;
        let created_at = match DateTime::parse_from_rfc3339(&dto.timestamp) {
            Ok(dt) => dt.with_timezone(&Utc),
            Err(e) => {
                warn!(
                    "History entry {} has unreadable timestamp '{}': {}",
                    dto.date, dto.timestamp, e
                );
                date.and_time(NaiveTime::MIN).and_utc()
            }
        };

        Some(DomainEntry {
            date,
            total_sold: dto.total_sold,
            total_requests: dto.total_requests,
            created_at,
            requests: dto.requests.into_iter().map(Self::snapshot_to_domain).collect(),
        })
    }

    pub fn to_dto(domain: DomainEntry) -> SharedEntry {
        SharedEntry {
            date: CalendarService::format_day(domain.date),
            total_sold: domain.total_sold,
            total_requests: domain.total_requests,
            timestamp: domain.created_at.to_rfc3339(),
            requests: domain.requests.into_iter().map(Self::snapshot_to_dto).collect(),
        }
    }

    fn snapshot_to_domain(dto: SharedSnapshot) -> HistorySnapshot {
        HistorySnapshot {
            id: dto.id,
            phone_number: dto.phone_number,
            amount: dto.amount,
            timestamp: dto.timestamp,
            completed: dto.completed,
        }
    }

    fn snapshot_to_dto(domain: HistorySnapshot) -> SharedSnapshot {
        SharedSnapshot {
            id: domain.id,
            phone_number: domain.phone_number,
            amount: domain.amount,
            timestamp: domain.timestamp,
            completed: domain.completed,
        }
    }
}
