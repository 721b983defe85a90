//! CleanerLoop - 期限切れタスクの削除
//!
//! # フロー
//! 1. today（設定タイムゾーン）を求める
//! 2. TaskStore::delete_due_before(today) で due_date < today を削除
//!
//! today 当日のタスクは残す。物理削除のみ（アーカイブなし）。

use std::sync::Arc;

use chrono_tz::Tz;
use tokio::sync::watch;
use tokio::time::{Duration, MissedTickBehavior};
use tracing::{error, info};

use crate::config::ScheduleConfig;
use crate::domain::NotiError;
use crate::ports::{Clock, TaskStore};

#[derive(Clone)]
pub struct CleanerLoop {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    interval: Duration,
}

impl CleanerLoop {
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>, schedule: &ScheduleConfig) -> Self {
        Self {
            store,
            clock,
            timezone: schedule.timezone,
            interval: schedule.cleanup_interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Delete every expired task. Returns how many were removed.
    pub async fn sweep_once(&self) -> Result<usize, NotiError> {
        let today = self.clock.today(self.timezone);
        let removed = self.store.delete_due_before(today).await?;
        info!(%today, removed, "cleaner sweep finished");
        Ok(removed)
    }

    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown_rx.borrow() {
                break;
            }
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            if let Err(e) = self.sweep_once().await {
                error!(error = %e, "cleaner sweep failed");
            }
        }
        info!("cleaner loop stopped");
    }
}
