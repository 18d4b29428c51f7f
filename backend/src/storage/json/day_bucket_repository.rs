//! # JSON Day Bucket Repository
//!
//! Stores the current day bucket in `phone-recharge-data.json`:
//!
//! ```json
//! {
//!   "requests": [
//!     { "id": 1704103200000, "phoneNumber": "5551234567", "amount": 10,
//!       "timestamp": "9:40:00 AM", "completed": false }
//!   ],
//!   "date": "2024-01-01"
//! }
//! ```
//!
//! Buckets written by older versions carry a slash date in either order
//! ("1/14/2024" or "14/1/2024"); those are read tolerantly and written back
//! in ISO form.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::connection::{JsonConnection, DAY_BUCKET_KEY};
use crate::domain::models::request::DayBucket;
use crate::io::rest::mappers::request_mapper::DayBucketMapper;
use crate::storage::DayBucketStorage;

#[derive(Clone)]
pub struct DayBucketRepository {
    connection: JsonConnection,
}

impl DayBucketRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl DayBucketStorage for DayBucketRepository {
    async fn get_day_bucket(&self) -> Result<DayBucket> {
        match self.connection.read_blob::<shared::DayBucket>(DAY_BUCKET_KEY)? {
            Some(stored) => Ok(DayBucketMapper::to_domain(stored)),
            None => {
                debug!("No day bucket stored yet, returning empty bucket");
                Ok(DayBucket::default())
            }
        }
    }

    async fn set_day_bucket(&self, bucket: &DayBucket) -> Result<()> {
        let stored = DayBucketMapper::to_dto(bucket.clone());
        self.connection.write_blob(DAY_BUCKET_KEY, &stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::request::RechargeRequest;
    use crate::storage::json::test_utils::TestEnvironment;
    use chrono::NaiveDate;
    use serde_json::json;

    #[tokio::test]
    async fn test_absent_store_yields_empty_bucket() {
        let env = TestEnvironment::new().unwrap();
        let repo = DayBucketRepository::new(env.connection.clone());

        let bucket = repo.get_day_bucket().await.unwrap();
        assert!(bucket.requests.is_empty());
        assert!(bucket.date.is_none());
    }

    #[tokio::test]
    async fn test_set_replaces_wholesale() {
        let env = TestEnvironment::new().unwrap();
        let repo = DayBucketRepository::new(env.connection.clone());
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let first = DayBucket {
            date: Some(date),
            requests: vec![RechargeRequest {
                id: 1,
                phone_number: "5551234567".to_string(),
                amount: 10.0,
                timestamp: "9:00:00 AM".to_string(),
                completed: false,
                name: Some("Ana".to_string()),
            }],
        };
        repo.set_day_bucket(&first).await.unwrap();
        assert_eq!(repo.get_day_bucket().await.unwrap(), first);

        let second = DayBucket::empty_for(date);
        repo.set_day_bucket(&second).await.unwrap();
        assert_eq!(repo.get_day_bucket().await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_reads_legacy_slash_dates() {
        let env = TestEnvironment::new().unwrap();
        let repo = DayBucketRepository::new(env.connection.clone());

        for (label, expected) in [
            ("1/14/2024", NaiveDate::from_ymd_opt(2024, 1, 14)),
            ("14/1/2024", NaiveDate::from_ymd_opt(2024, 1, 14)),
            ("9/3/2024", NaiveDate::from_ymd_opt(2024, 9, 3)),
        ] {
            env.connection
                .write_blob(
                    DAY_BUCKET_KEY,
                    &json!({
                        "requests": [{"id": 7, "phoneNumber": "5550000000", "amount": 5, "timestamp": "1:00:00 PM", "completed": true}],
                        "date": label
                    }),
                )
                .unwrap();

            let bucket = repo.get_day_bucket().await.unwrap();
            assert_eq!(bucket.date, expected, "label {}", label);
            assert_eq!(bucket.requests.len(), 1);
            assert!(bucket.requests[0].completed);
        }
    }

    #[tokio::test]
    async fn test_null_amount_reads_as_zero() {
        let env = TestEnvironment::new().unwrap();
        env.connection
            .write_blob(
                DAY_BUCKET_KEY,
                &json!({
                    "requests": [
                        {"id": 1, "phoneNumber": "5550000000", "amount": null, "timestamp": "1:00:00 PM"},
                        {"id": 2, "phoneNumber": "5550000001", "amount": 7.5, "timestamp": "1:05:00 PM"}
                    ],
                    "date": "2024-03-09"
                }),
            )
            .unwrap();
        let repo = DayBucketRepository::new(env.connection.clone());

        let bucket = repo.get_day_bucket().await.unwrap();
        assert_eq!(bucket.requests.len(), 2);
        assert_eq!(bucket.requests[0].amount, 0.0);
        assert_eq!(bucket.total_sold(), 7.5);
    }

    #[tokio::test]
    async fn test_writes_iso_date() {
        let env = TestEnvironment::new().unwrap();
        let repo = DayBucketRepository::new(env.connection.clone());
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        repo.set_day_bucket(&DayBucket::empty_for(date)).await.unwrap();

        let raw: serde_json::Value = env.connection.read_blob(DAY_BUCKET_KEY).unwrap().unwrap();
        assert_eq!(raw["date"], "2024-03-09");
    }
}
