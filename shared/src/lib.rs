use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Stored amounts from older clients can be `null` (a number that failed to
/// parse) or missing altogether; both read as zero.
fn amount_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_else(|| {
        warn!("Stored amount is null, reading it as 0");
        0.0
    }))
}

fn missing_amount() -> f64 {
    warn!("Stored request has no amount, reading it as 0");
    0.0
}

/// A single phone-recharge request as submitted by a customer.
///
/// Request ID is timestamp-derived (epoch millis) and unique within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RechargeRequest {
    pub id: u64,
    pub phone_number: String,
    #[serde(default = "missing_amount", deserialize_with = "amount_or_zero")]
    pub amount: f64,
    /// Local display time of the submission (e.g. "9:41:07 AM")
    pub timestamp: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The current day's requests plus the date label of that day.
///
/// `date` is an ISO 8601 calendar date ("2024-01-31"), or blank when the
/// store has never been written.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DayBucket {
    #[serde(default)]
    pub requests: Vec<RechargeRequest>,
    #[serde(default)]
    pub date: String,
}

/// Display-safe copy of a request kept inside a history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
    pub id: u64,
    pub phone_number: String,
    #[serde(default = "missing_amount", deserialize_with = "amount_or_zero")]
    pub amount: f64,
    pub timestamp: String,
    #[serde(default)]
    pub completed: bool,
}

/// Aggregate of one closed business day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub date: String,
    pub total_sold: f64,
    pub total_requests: usize,
    /// When the entry was created (RFC 3339)
    pub timestamp: String,
    #[serde(default)]
    pub requests: Vec<HistoryRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRechargeRequest {
    pub phone_number: String,
    pub amount: f64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRechargeResponse {
    pub request: RechargeRequest,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleCompletionResponse {
    pub request: RechargeRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRequestsRequest {
    pub ids: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequestsResponse {
    pub deleted_count: usize,
    pub not_found_ids: Vec<u64>,
    pub success_message: String,
}

/// Dashboard totals for the current day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummaryResponse {
    pub date: String,
    pub total_sold: f64,
    pub total_requests: usize,
    pub completed_count: usize,
    pub pending_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Who a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    /// The configured superuser
    Admin,
    /// A registered account
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub username: String,
    pub role: SessionRole,
    /// Expiry of the token (RFC 3339)
    pub expires_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfoResponse {
    pub username: String,
    pub role: SessionRole,
    pub expires_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Password-free view of a registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub username: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteUserRequest {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub username: String,
    pub new_password: String,
}

/// Generic acknowledgement body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }
}

/// Result of a daily reset trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyResetStatus {
    /// Outside the configured local hours
    Skipped,
    /// The bucket was already empty and dated today
    AlreadyDone,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyResetResponse {
    pub success: bool,
    pub status: DailyResetStatus,
    pub message: String,
    /// Local hour in the business timezone when the trigger was handled
    pub local_hour: u32,
    /// Business date the bucket is stamped with after the call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Entry written to history by this call, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<HistoryEntry>,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
