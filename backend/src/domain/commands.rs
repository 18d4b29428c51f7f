//! Domain-level command and result types.
//!
//! Services take and return these; the REST layer maps the public DTOs from
//! the `shared` crate to them.

pub mod requests {
    use chrono::NaiveDate;

    /// Input for a customer submission
    #[derive(Debug, Clone)]
    pub struct SubmitRequestCommand {
        pub phone_number: String,
        pub amount: f64,
        pub name: Option<String>,
    }

    /// Command for deleting multiple requests
    #[derive(Debug, Clone)]
    pub struct DeleteRequestsCommand {
        pub ids: Vec<u64>,
    }

    /// Result of deleting requests
    #[derive(Debug, Clone)]
    pub struct DeleteRequestsResult {
        pub deleted_count: usize,
        pub not_found_ids: Vec<u64>,
        pub success_message: String,
    }

    /// Totals for the current day
    #[derive(Debug, Clone, PartialEq)]
    pub struct DaySummary {
        pub date: Option<NaiveDate>,
        pub total_sold: f64,
        pub total_requests: usize,
        pub completed_count: usize,
        pub pending_count: usize,
    }
}

pub mod accounts {
    /// Input for the credential check
    #[derive(Debug, Clone)]
    pub struct LoginCommand {
        pub username: String,
        pub password: String,
    }

    /// Input for registering an account
    #[derive(Debug, Clone)]
    pub struct RegisterCommand {
        pub username: String,
        pub password: String,
    }

    /// Input for an administrative password reset
    #[derive(Debug, Clone)]
    pub struct ResetPasswordCommand {
        pub username: String,
        pub new_password: String,
    }
}

pub mod rollover {
    use chrono::NaiveDate;

    use crate::domain::models::history::HistoryEntry;

    /// What a rollover trigger did
    #[derive(Debug, Clone, PartialEq)]
    pub enum RolloverOutcome {
        /// Triggered outside the configured local hours
        Skipped { local_hour: u32 },
        /// The bucket was already empty and stamped with today's date
        AlreadyReset { date: NaiveDate },
        /// The bucket was reset to `date`, archiving its requests if any
        Completed {
            date: NaiveDate,
            archived: Option<HistoryEntry>,
        },
    }
}
