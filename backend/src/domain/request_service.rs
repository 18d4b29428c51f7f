use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::domain::calendar::CalendarService;
use crate::domain::commands::requests::{
    DaySummary, DeleteRequestsCommand, DeleteRequestsResult, SubmitRequestCommand,
};
use crate::domain::models::request::{DayBucket, RechargeRequest, RequestError, MIN_PHONE_DIGITS};
use crate::storage::DayBucketStorage;

/// Service for the current-day request store.
///
/// Every mutation is a read-modify-write of the whole bucket; concurrent
/// writers are not coordinated and the last write wins.
#[derive(Clone)]
pub struct RequestService {
    bucket_storage: Arc<dyn DayBucketStorage>,
    calendar: CalendarService,
}

impl RequestService {
    pub fn new(bucket_storage: Arc<dyn DayBucketStorage>, calendar: CalendarService) -> Self {
        Self {
            bucket_storage,
            calendar,
        }
    }

    pub async fn get_day_bucket(&self) -> Result<DayBucket> {
        self.bucket_storage.get_day_bucket().await
    }

    /// Replace the bucket wholesale with a caller-supplied one
    pub async fn replace_day_bucket(&self, bucket: DayBucket) -> Result<DayBucket> {
        bucket.validate()?;
        info!(
            "Replacing day bucket: {} requests, date {:?}",
            bucket.requests.len(),
            bucket.date
        );
        self.bucket_storage.set_day_bucket(&bucket).await?;
        Ok(bucket)
    }

    /// Append a customer submission to today's bucket
    pub async fn submit_request(&self, command: SubmitRequestCommand) -> Result<RechargeRequest> {
        let phone_number = command.phone_number.trim().to_string();
        if phone_number.is_empty() {
            return Err(RequestError::MissingFields.into());
        }
        if RechargeRequest::phone_digit_count(&phone_number) < MIN_PHONE_DIGITS {
            return Err(RequestError::PhoneNumberTooShort.into());
        }
        if !command.amount.is_finite() || command.amount <= 0.0 {
            return Err(RequestError::InvalidAmount.into());
        }

        let mut bucket = self.bucket_storage.get_day_bucket().await?;
        if bucket.date.is_none() {
            bucket.date = Some(self.calendar.today());
        }

        let request = RechargeRequest {
            id: RechargeRequest::generate_id(self.calendar.now_millis(), &bucket.requests)?,
            phone_number,
            amount: command.amount,
            timestamp: self.calendar.display_time(),
            completed: false,
            name: command
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        };

        bucket.requests.push(request.clone());
        self.bucket_storage.set_day_bucket(&bucket).await?;

        info!("Submitted request {} for ${:.2}", request.id, request.amount);
        Ok(request)
    }

    /// Flip the completed flag of one request
    pub async fn toggle_completion(&self, id: u64) -> Result<RechargeRequest> {
        let mut bucket = self.bucket_storage.get_day_bucket().await?;

        let request = bucket
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RequestError::NotFound(id))?;
        request.completed = !request.completed;
        let updated = request.clone();

        self.bucket_storage.set_day_bucket(&bucket).await?;
        info!("Request {} marked completed={}", id, updated.completed);
        Ok(updated)
    }

    /// Remove the given requests from today's bucket
    pub async fn delete_requests(&self, command: DeleteRequestsCommand) -> Result<DeleteRequestsResult> {
        let mut bucket = self.bucket_storage.get_day_bucket().await?;

        let not_found_ids: Vec<u64> = command
            .ids
            .iter()
            .copied()
            .filter(|id| !bucket.requests.iter().any(|r| r.id == *id))
            .collect();

        let before = bucket.requests.len();
        bucket.requests.retain(|r| !command.ids.contains(&r.id));
        let deleted_count = before - bucket.requests.len();

        if deleted_count > 0 {
            self.bucket_storage.set_day_bucket(&bucket).await?;
        }

        let success_message = match deleted_count {
            0 => "No requests were deleted".to_string(),
            1 => "Deleted 1 request".to_string(),
            n => format!("Deleted {} requests", n),
        };
        info!("{} ({} ids not found)", success_message, not_found_ids.len());

        Ok(DeleteRequestsResult {
            deleted_count,
            not_found_ids,
            success_message,
        })
    }

    /// Dashboard totals for the current bucket
    pub async fn day_summary(&self) -> Result<DaySummary> {
        let bucket = self.bucket_storage.get_day_bucket().await?;
        let completed_count = bucket.completed_count();

        Ok(DaySummary {
            date: bucket.date,
            total_sold: bucket.total_sold(),
            total_requests: bucket.requests.len(),
            completed_count,
            pending_count: bucket.requests.len() - completed_count,
        })
    }
}
