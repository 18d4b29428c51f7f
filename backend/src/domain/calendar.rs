//! Business-day calendar logic.
//!
//! All "today" and "what hour is it" questions are answered in the business
//! timezone rather than the host's local zone, and every stored date goes
//! through `parse_day`/`format_day` so comparisons happen on real calendar
//! dates instead of locale-formatted strings.

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant (for tests)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Calendar service bound to the business timezone
#[derive(Clone)]
pub struct CalendarService {
    timezone: Tz,
    clock: Arc<dyn Clock>,
}

impl CalendarService {
    pub fn new(timezone: Tz) -> Self {
        Self::with_clock(timezone, Arc::new(SystemClock))
    }

    pub fn with_clock(timezone: Tz, clock: Arc<dyn Clock>) -> Self {
        Self { timezone, clock }
    }

    /// Resolve an IANA timezone name such as "America/New_York"
    pub fn parse_timezone(name: &str) -> Result<Tz> {
        name.trim()
            .parse::<Tz>()
            .map_err(|e| anyhow!("Unknown timezone '{}': {}", name, e))
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn local_now(&self) -> DateTime<Tz> {
        self.clock.now().with_timezone(&self.timezone)
    }

    /// Today's date in the business timezone
    pub fn today(&self) -> NaiveDate {
        self.local_now().date_naive()
    }

    pub fn local_hour(&self) -> u32 {
        self.local_now().hour()
    }

    /// Local time of day as shown on the dashboard, e.g. "9:41:07 AM"
    pub fn display_time(&self) -> String {
        self.local_now().format("%-I:%M:%S %p").to_string()
    }

    /// Current instant as epoch milliseconds
    pub fn now_millis(&self) -> u64 {
        self.clock.now().timestamp_millis().max(0) as u64
    }

    /// Parse a stored day label.
    ///
    /// Accepts ISO 8601 ("2024-01-31") and the legacy slash forms written by
    /// older clients, both day-first ("31/1/2024") and month-first
    /// ("1/31/2024"). A field above 12 settles the order; when both fields
    /// could be a month the label is read month-first. Blank or unrecognised
    /// input yields `None`.
    pub fn parse_day(value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            return Some(date);
        }

        let mut parts = value.split('/').map(|p| p.trim().parse::<u32>());
        let (first, second, year) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(first)), Some(Ok(second)), Some(Ok(year)), None) => (first, second, year),
            _ => return None,
        };
        let year = i32::try_from(year).ok()?;

        if first > 12 {
            NaiveDate::from_ymd_opt(year, second, first)
        } else {
            NaiveDate::from_ymd_opt(year, first, second)
        }
    }

    /// Canonical stored form of a day label
    pub fn format_day(date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }
}
