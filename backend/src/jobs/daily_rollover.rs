//! In-process trigger for the History Roller, for deployments without an
//! external cron hitting `/api/cron/daily-reset`.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::domain::commands::rollover::RolloverOutcome;
use crate::domain::rollover_service::RolloverService;

/// Poll the rollover window every `poll_interval`. Inside the window the
/// first poll rolls over; later polls find the bucket already reset.
pub fn start_daily_rollover_job(rollover_service: RolloverService, poll_interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!("Daily rollover job polling every {:?}", poll_interval);

        loop {
            ticker.tick().await;

            match rollover_service.run_scheduled().await {
                Ok(RolloverOutcome::Completed { date, archived }) => {
                    tracing::info!(
                        "Scheduled rollover to {} complete ({} requests archived)",
                        date,
                        archived.map_or(0, |e| e.total_requests)
                    );
                }
                Ok(outcome) => tracing::debug!("Scheduled rollover: {:?}", outcome),
                Err(e) => tracing::error!("Scheduled rollover failed: {:#}", e),
            }
        }
    })
}
