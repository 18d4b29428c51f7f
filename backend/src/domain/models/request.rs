//! Domain model for recharge requests and the current-day bucket.
use chrono::NaiveDate;
use std::collections::HashSet;

/// Minimum number of digits a phone number must contain
pub const MIN_PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct RechargeRequest {
    pub id: u64,
    pub phone_number: String,
    pub amount: f64,
    pub timestamp: String,
    pub completed: bool,
    pub name: Option<String>,
}

impl RechargeRequest {
    /// Generate a request ID from the current epoch millis, strictly greater
    /// than every ID already in use
    pub fn generate_id(now_millis: u64, existing: &[RechargeRequest]) -> Result<u64, RequestError> {
        let next = match existing.iter().map(|r| r.id).max() {
            Some(highest) => highest.checked_add(1).ok_or(RequestError::IdsExhausted)?,
            None => 0,
        };
        Ok(now_millis.max(next))
    }

    /// Count the digits in a phone number, ignoring formatting characters
    pub fn phone_digit_count(phone_number: &str) -> usize {
        phone_number.chars().filter(|c| c.is_ascii_digit()).count()
    }
}

/// The single live collection of today's requests
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DayBucket {
    /// Business day this bucket belongs to; `None` when never stamped
    pub date: Option<NaiveDate>,
    pub requests: Vec<RechargeRequest>,
}

impl DayBucket {
    pub fn empty_for(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            requests: Vec::new(),
        }
    }

    pub fn total_sold(&self) -> f64 {
        self.requests.iter().map(|r| r.amount).sum()
    }

    pub fn completed_count(&self) -> usize {
        self.requests.iter().filter(|r| r.completed).count()
    }

    /// Check a caller-supplied bucket: amounts must be finite and not
    /// negative, and no ID may appear twice
    pub fn validate(&self) -> Result<(), RequestError> {
        let mut seen = HashSet::with_capacity(self.requests.len());
        for request in &self.requests {
            if !request.amount.is_finite() || request.amount < 0.0 {
                return Err(RequestError::InvalidRequestAmount(request.id));
            }
            if !seen.insert(request.id) {
                return Err(RequestError::DuplicateId(request.id));
            }
        }
        Ok(())
    }

    /// True when the bucket is stamped with `today` and holds nothing
    pub fn is_reset_for(&self, today: NaiveDate) -> bool {
        self.date == Some(today) && self.requests.is_empty()
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("Phone number and amount are required")]
    MissingFields,
    #[error("Phone number must be at least 10 digits")]
    PhoneNumberTooShort,
    #[error("Amount must be a positive number")]
    InvalidAmount,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Request {0} has an invalid amount")]
    InvalidRequestAmount(u64),
    #[error("Duplicate request id: {0}")]
    DuplicateId(u64),
    #[error("No request id available")]
    IdsExhausted,
    #[error("Request not found: {0}")]
    NotFound(u64),
}
