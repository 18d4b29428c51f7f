//! Domain model for closed business days.
use chrono::{DateTime, NaiveDate, Utc};

use super::request::{DayBucket, RechargeRequest};

/// Display-safe copy of a request stored with a history entry
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    pub id: u64,
    pub phone_number: String,
    pub amount: f64,
    pub timestamp: String,
    pub completed: bool,
}

impl From<&RechargeRequest> for HistorySnapshot {
    fn from(request: &RechargeRequest) -> Self {
        Self {
            id: request.id,
            phone_number: request.phone_number.clone(),
            amount: request.amount,
            timestamp: request.timestamp.clone(),
            completed: request.completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub total_sold: f64,
    pub total_requests: usize,
    pub created_at: DateTime<Utc>,
    pub requests: Vec<HistorySnapshot>,
}

impl HistoryEntry {
    /// Aggregate a day bucket into an entry dated `date`
    pub fn from_bucket(bucket: &DayBucket, date: NaiveDate, created_at: DateTime<Utc>) -> Self {
        Self {
            date,
            total_sold: bucket.total_sold(),
            total_requests: bucket.requests.len(),
            created_at,
            requests: bucket.requests.iter().map(HistorySnapshot::from).collect(),
        }
    }

    /// Fold another entry for the same day into this one
    pub fn absorb(&mut self, other: HistoryEntry) {
        self.total_sold += other.total_sold;
        self.total_requests += other.total_requests;
        self.created_at = self.created_at.max(other.created_at);
        self.requests.extend(other.requests);
    }
}
