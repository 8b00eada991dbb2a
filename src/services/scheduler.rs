//! Daily maintenance scheduler.
//!
//! The ledger's sweeps (closing shifts left open yesterday, clearing
//! rest-day and suspension flags) only happen when something invokes
//! them, so a cron job drives them once per day shortly after midnight.

use anyhow::Result;
use chrono::{Duration as ChronoDuration, Local};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::ScheduleConfig;
use crate::domain::events::NotificationEvent;
use crate::state::SharedState;

pub struct Scheduler {
    state: Arc<SharedState>,
    config: ScheduleConfig,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    #[must_use]
    pub fn new(state: Arc<SharedState>, config: ScheduleConfig) -> Self {
        Self {
            state,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Scheduler is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;
        info!("Starting daily maintenance scheduler");

        let mut sched = JobScheduler::new().await?;

        let state = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);
        let job = Job::new_async(self.config.daily_cron.as_str(), move |_uuid, _lock| {
            let state = Arc::clone(&state);
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                run_daily_maintenance(&state).await;
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;
        info!("Daily maintenance scheduled: {}", self.config.daily_cron);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    pub async fn stop(&self) {
        *self.running.write().await = false;
    }
}

/// The midnight sweep: auto-close yesterday's open shifts at 23:00 of
/// that day, then lift every block state back to active.
pub async fn run_daily_maintenance(state: &SharedState) {
    let start = std::time::Instant::now();
    info!(event = "job_started", job_name = "daily_maintenance", "Starting daily maintenance");

    let yesterday = (Local::now().naive_local() - ChronoDuration::days(1)).date();
    match state.shifts.auto_close_for_date(yesterday).await {
        Ok(count) => info!(count, %yesterday, "Closed leftover shifts"),
        Err(e) => {
            error!(event = "job_failed", job_name = "daily_maintenance", error = %e, "Shift auto-close failed");
            let _ = state.event_bus.send(NotificationEvent::Error {
                message: format!("Shift auto-close failed: {e}"),
            });
        }
    }

    match state.attendance.reset_inactive().await {
        Ok(count) => info!(count, "Cleared attendance flags"),
        Err(e) => {
            error!(event = "job_failed", job_name = "daily_maintenance", error = %e, "Attendance reset failed");
            let _ = state.event_bus.send(NotificationEvent::Error {
                message: format!("Attendance reset failed: {e}"),
            });
        }
    }

    let _ = state.event_bus.send(NotificationEvent::Info {
        message: "Daily maintenance finished".to_string(),
    });
    info!(
        event = "job_finished",
        job_name = "daily_maintenance",
        duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Daily maintenance finished"
    );
}
