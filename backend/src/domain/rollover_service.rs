use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::domain::calendar::CalendarService;
use crate::domain::commands::rollover::RolloverOutcome;
use crate::domain::history_service::HistoryService;
use crate::domain::models::history::HistoryEntry;
use crate::domain::models::request::DayBucket;
use crate::storage::DayBucketStorage;

/// Local hours during which a scheduled trigger is allowed to roll over
pub const DEFAULT_ROLLOVER_HOURS: [u32; 2] = [3, 4];

/// Closes the business day: archives the bucket into history and stamps a
/// fresh, empty bucket with today's date.
#[derive(Clone)]
pub struct RolloverService {
    bucket_storage: Arc<dyn DayBucketStorage>,
    history_service: HistoryService,
    calendar: CalendarService,
    allowed_hours: Vec<u32>,
}

impl RolloverService {
    pub fn new(
        bucket_storage: Arc<dyn DayBucketStorage>,
        history_service: HistoryService,
        calendar: CalendarService,
        allowed_hours: Vec<u32>,
    ) -> Self {
        Self {
            bucket_storage,
            history_service,
            calendar,
            allowed_hours,
        }
    }

    pub fn is_rollover_hour(&self, local_hour: u32) -> bool {
        self.allowed_hours.contains(&local_hour)
    }

    /// Trigger entry point: rolls over only inside the allowed local hours
    pub async fn run_scheduled(&self) -> Result<RolloverOutcome> {
        let local_hour = self.calendar.local_hour();
        if !self.is_rollover_hour(local_hour) {
            info!(
                "Skipping rollover: local hour {} not in {:?}",
                local_hour, self.allowed_hours
            );
            return Ok(RolloverOutcome::Skipped { local_hour });
        }

        self.roll_over().await
    }

    /// Unconditional rollover. Idempotent within a day.
    ///
    /// History is written before the bucket is reset. If the reset fails the
    /// next run archives the same requests again (merged into the same date).
    pub async fn roll_over(&self) -> Result<RolloverOutcome> {
        let today = self.calendar.today();
        let bucket = self
            .bucket_storage
            .get_day_bucket()
            .await
            .context("Failed to read day bucket")?;

        if bucket.is_reset_for(today) {
            info!("Day bucket already reset for {}", today);
            return Ok(RolloverOutcome::AlreadyReset { date: today });
        }

        let archived = if bucket.requests.is_empty() {
            None
        } else {
            let closed_date = bucket.date.unwrap_or(today);
            let entry = HistoryEntry::from_bucket(&bucket, closed_date, self.calendar.now_utc());
            self.history_service
                .append_entry(entry.clone())
                .await
                .context("Failed to archive day bucket")?;
            Some(entry)
        };

        self.bucket_storage
            .set_day_bucket(&DayBucket::empty_for(today))
            .await
            .context("Failed to reset day bucket")?;

        info!(
            "Rolled over to {} ({} requests archived)",
            today,
            archived.as_ref().map_or(0, |e| e.total_requests)
        );
        Ok(RolloverOutcome::Completed { date: today, archived })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calendar::FixedClock;
    use crate::domain::models::request::RechargeRequest;
    use crate::storage::json::connection::{DAY_BUCKET_KEY, HISTORY_KEY};
    use crate::storage::json::test_utils::{sample_history_entry, TestEnvironment};
    use crate::storage::{DayBucketRepository, HistoryRepository, HistoryStorage};
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::json;

    struct Fixture {
        service: RolloverService,
        buckets: DayBucketRepository,
        history: HistoryRepository,
    }

    /// `utc_hour` on 2024-01-16; New York is UTC-5 in January
    fn setup_test(env: &TestEnvironment, utc_hour: u32) -> Fixture {
        let tz = CalendarService::parse_timezone("America/New_York").unwrap();
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 16, utc_hour, 0, 0).unwrap());
        let calendar = CalendarService::with_clock(tz, Arc::new(clock));

        let buckets = DayBucketRepository::new(env.connection.clone());
        let history = HistoryRepository::new(env.connection.clone());
        let history_service = HistoryService::new(Arc::new(history.clone()), 15);
        let service = RolloverService::new(
            Arc::new(buckets.clone()),
            history_service,
            calendar,
            DEFAULT_ROLLOVER_HOURS.to_vec(),
        );

        Fixture {
            service,
            buckets,
            history,
        }
    }

    fn request(id: u64, amount: f64, completed: bool) -> RechargeRequest {
        RechargeRequest {
            id,
            phone_number: "5551234567".to_string(),
            amount,
            timestamp: "10:00:00 AM".to_string(),
            completed,
            name: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test]
    async fn test_roll_over_archives_previous_day() {
        let env = TestEnvironment::new().unwrap();
        let f = setup_test(&env, 8);
        f.buckets
            .set_day_bucket(&DayBucket {
                date: Some(day(15)),
                requests: vec![request(1, 10.0, true), request(2, 5.5, false)],
            })
            .await
            .unwrap();

        let outcome = f.service.roll_over().await.unwrap();

        let (date, archived) = match outcome {
            RolloverOutcome::Completed { date, archived } => (date, archived),
            other => panic!("expected a completed rollover, got {:?}", other),
        };
        assert_eq!(date, day(16));
        let archived = archived.unwrap();
        assert_eq!(archived.date, day(15));
        assert_eq!(archived.total_sold, 15.5);
        assert_eq!(archived.total_requests, 2);

        assert_eq!(f.buckets.get_day_bucket().await.unwrap(), DayBucket::empty_for(day(16)));
        let history = f.history.list_history().await.unwrap();
        assert_eq!(history, vec![archived]);
    }

    #[tokio::test]
    async fn test_roll_over_twice_is_idempotent() {
        let env = TestEnvironment::new().unwrap();
        let f = setup_test(&env, 8);
        f.buckets
            .set_day_bucket(&DayBucket {
                date: Some(day(15)),
                requests: vec![request(1, 10.0, false)],
            })
            .await
            .unwrap();

        f.service.roll_over().await.unwrap();
        let second = f.service.roll_over().await.unwrap();

        assert_eq!(second, RolloverOutcome::AlreadyReset { date: day(16) });
        assert_eq!(f.history.list_history().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_roll_over_empty_bucket_writes_no_history() {
        let env = TestEnvironment::new().unwrap();
        let f = setup_test(&env, 8);
        f.buckets.set_day_bucket(&DayBucket::empty_for(day(15))).await.unwrap();

        let outcome = f.service.roll_over().await.unwrap();

        assert_eq!(
            outcome,
            RolloverOutcome::Completed {
                date: day(16),
                archived: None
            }
        );
        assert!(f.history.list_history().await.unwrap().is_empty());
        assert_eq!(f.buckets.get_day_bucket().await.unwrap().date, Some(day(16)));
    }

    #[tokio::test]
    async fn test_roll_over_undated_bucket_uses_today() {
        let env = TestEnvironment::new().unwrap();
        let f = setup_test(&env, 8);
        f.buckets
            .set_day_bucket(&DayBucket {
                date: None,
                requests: vec![request(1, 4.0, false)],
            })
            .await
            .unwrap();

        f.service.roll_over().await.unwrap();

        let history = f.history.list_history().await.unwrap();
        assert_eq!(history[0].date, day(16));
    }

    #[tokio::test]
    async fn test_roll_over_archives_month_first_bucket_under_its_own_date() {
        let env = TestEnvironment::new().unwrap();
        let f = setup_test(&env, 8);
        env.connection
            .write_blob(
                DAY_BUCKET_KEY,
                &json!({
                    "requests": [{"id": 1, "phoneNumber": "5551234567", "amount": 10, "timestamp": "10:00:00 AM", "completed": false}],
                    "date": "1/14/2024"
                }),
            )
            .unwrap();

        f.service.roll_over().await.unwrap();

        let history = f.history.list_history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].date, day(14));
    }

    #[tokio::test]
    async fn test_roll_over_keeps_existing_legacy_history() {
        let env = TestEnvironment::new().unwrap();
        let f = setup_test(&env, 8);
        env.connection
            .write_blob(
                HISTORY_KEY,
                &json!([
                    {"date": "12/31/2023", "totalSold": 4, "totalRequests": 1, "timestamp": "2024-01-01T08:00:00Z"},
                    {"date": "no idea", "totalSold": 2, "totalRequests": 1, "timestamp": "2024-01-01T08:00:00Z"}
                ]),
            )
            .unwrap();
        f.buckets
            .set_day_bucket(&DayBucket {
                date: Some(day(15)),
                requests: vec![request(1, 10.0, false)],
            })
            .await
            .unwrap();

        f.service.roll_over().await.unwrap();

        let history = f.history.list_history().await.unwrap();
        let dates: Vec<NaiveDate> = history.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(15), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()]);

        let raw: serde_json::Value = env.connection.read_blob(HISTORY_KEY).unwrap().unwrap();
        assert_eq!(raw.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_roll_over_merges_into_existing_date() {
        let env = TestEnvironment::new().unwrap();
        let f = setup_test(&env, 8);
        f.history
            .replace_history(&[sample_history_entry(day(15), &[1.0])])
            .await
            .unwrap();
        f.buckets
            .set_day_bucket(&DayBucket {
                date: Some(day(15)),
                requests: vec![request(9, 2.0, false)],
            })
            .await
            .unwrap();

        f.service.roll_over().await.unwrap();

        let history = f.history.list_history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].total_sold, 3.0);
        assert_eq!(history[0].total_requests, 2);
    }

    #[tokio::test]
    async fn test_run_scheduled_outside_window_changes_nothing() {
        let env = TestEnvironment::new().unwrap();
        // 12:00 UTC is 07:00 in New York
        let f = setup_test(&env, 12);
        let bucket = DayBucket {
            date: Some(day(15)),
            requests: vec![request(1, 10.0, false)],
        };
        f.buckets.set_day_bucket(&bucket).await.unwrap();

        let outcome = f.service.run_scheduled().await.unwrap();

        assert_eq!(outcome, RolloverOutcome::Skipped { local_hour: 7 });
        assert_eq!(f.buckets.get_day_bucket().await.unwrap(), bucket);
        assert!(f.history.list_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_scheduled_inside_window() {
        let env = TestEnvironment::new().unwrap();
        // 09:00 UTC is 04:00 in New York
        let f = setup_test(&env, 9);
        f.buckets
            .set_day_bucket(&DayBucket {
                date: Some(day(15)),
                requests: vec![request(1, 10.0, false)],
            })
            .await
            .unwrap();

        let outcome = f.service.run_scheduled().await.unwrap();

        assert!(matches!(outcome, RolloverOutcome::Completed { archived: Some(_), .. }));
    }
}
