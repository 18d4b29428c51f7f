pub mod daily_rollover;

pub use daily_rollover::start_daily_rollover_job;
