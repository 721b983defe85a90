//! NotifierLoop - 期日が近いタスクへのリマインダー送信
//!
//! # フロー（1 スキャン）
//! 1. TaskStore::list() で全タスクを取得
//! 2. today（設定タイムゾーン）との差分で Urgency を判定
//! 3. 対象タスクごとに MessageSink::deliver() を 1 回だけ呼ぶ
//! 4. 送信失敗はログに出して次のタスクへ（スキャンは止めない）
//!
//! スキャン間の重複排除はしない。毎日のスキャンで同じタスクに再送されるのは仕様。

use std::sync::Arc;

use chrono_tz::Tz;
use tokio::sync::watch;
use tokio::time::{Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::ScheduleConfig;
use crate::domain::{NotiError, Reminder, Urgency};
use crate::ports::{Clock, MessageSink, TaskStore};

/// Result of one notifier pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub scanned: usize,
    pub due_today: usize,
    pub due_tomorrow: usize,
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct NotifierLoop {
    store: Arc<dyn TaskStore>,
    sink: Arc<dyn MessageSink>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    interval: Duration,
}

impl NotifierLoop {
    pub fn new(
        store: Arc<dyn TaskStore>,
        sink: Arc<dyn MessageSink>,
        clock: Arc<dyn Clock>,
        schedule: &ScheduleConfig,
    ) -> Self {
        Self {
            store,
            sink,
            clock,
            timezone: schedule.timezone,
            interval: schedule.reminder_interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One full scan. Only a store failure aborts it.
    pub async fn scan_once(&self) -> Result<ScanReport, NotiError> {
        let today = self.clock.today(self.timezone);
        let tasks = self.store.list().await?;
        let mut report = ScanReport {
            scanned: tasks.len(),
            ..ScanReport::default()
        };

        for task in &tasks {
            let Some(urgency) = Urgency::classify(task.due_date, today) else {
                continue;
            };
            match urgency {
                Urgency::DueToday => report.due_today += 1,
                Urgency::DueTomorrow => report.due_tomorrow += 1,
            }

            let reminder = Reminder::for_task(task, urgency);
            match self.sink.deliver(&reminder).await {
                Ok(()) => {
                    debug!(task_id = %task.task_id, ?urgency, "reminder delivered");
                    report.delivered += 1;
                }
                Err(e) => {
                    warn!(task_id = %task.task_id, ?urgency, error = %e, "reminder delivery failed");
                    report.failed += 1;
                }
            }
        }

        info!(
            %today,
            scanned = report.scanned,
            due_today = report.due_today,
            due_tomorrow = report.due_tomorrow,
            delivered = report.delivered,
            failed = report.failed,
            "notifier scan finished"
        );
        Ok(report)
    }

    /// Scan immediately, then every `interval`, until shutdown is signalled.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown_rx.borrow() {
                break;
            }
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    // sender が drop されたら止める
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            if let Err(e) = self.scan_once().await {
                error!(error = %e, "notifier scan aborted");
            }
        }
        info!("notifier loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewTask, Task, UserId};
    use crate::impls::{InMemoryTaskStore, RecordingSink};
    use crate::ports::FixedClock;
    use chrono::{NaiveDate, TimeZone, Utc};

    struct Fixture {
        store: Arc<InMemoryTaskStore>,
        sink: Arc<RecordingSink>,
        notifier: NotifierLoop,
    }

    /// 2024-12-24 12:00 PST
    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryTaskStore::new());
        let sink = Arc::new(RecordingSink::new());
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 12, 24, 20, 0, 0).unwrap(),
        ));
        let notifier = NotifierLoop::new(
            store.clone(),
            sink.clone(),
            clock,
            &ScheduleConfig::default(),
        );
        Fixture { store, sink, notifier }
    }

    async fn add(store: &InMemoryTaskStore, assignment: &str, day: u32) -> Task {
        store
            .insert(NewTask {
                user_id: UserId::new("1"),
                channel_id: None,
                class_name: "CS101".into(),
                assignment_name: assignment.into(),
                due_date: NaiveDate::from_ymd_opt(2024, 12, day).unwrap(),
                created_at: Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn only_today_and_tomorrow_are_notified() {
        let f = fixture();
        add(&f.store, "past", 23).await;
        let today = add(&f.store, "today", 24).await;
        let tomorrow = add(&f.store, "tomorrow", 25).await;
        add(&f.store, "later", 26).await;

        let report = f.notifier.scan_once().await.unwrap();

        assert_eq!(
            report,
            ScanReport {
                scanned: 4,
                due_today: 1,
                due_tomorrow: 1,
                delivered: 2,
                failed: 0,
            }
        );
        let sent = f.sink.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].task_id, today.task_id);
        assert_eq!(sent[0].urgency, Urgency::DueToday);
        assert_eq!(sent[1].task_id, tomorrow.task_id);
        assert_eq!(sent[1].urgency, Urgency::DueTomorrow);
    }

    #[tokio::test]
    async fn one_failed_delivery_does_not_stop_the_scan() {
        let f = fixture();
        let broken = add(&f.store, "a", 24).await;
        let ok = add(&f.store, "b", 25).await;
        f.sink.fail_for(broken.task_id);

        let report = f.notifier.scan_once().await.unwrap();

        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(f.sink.sent()[0].task_id, ok.task_id);
    }

    #[tokio::test]
    async fn repeated_scans_repeat_reminders() {
        let f = fixture();
        add(&f.store, "today", 24).await;

        f.notifier.scan_once().await.unwrap();
        f.notifier.scan_once().await.unwrap();

        assert_eq!(f.sink.sent().len(), 2);
    }

    #[tokio::test]
    async fn empty_store_is_a_quiet_scan() {
        let f = fixture();
        assert_eq!(f.notifier.scan_once().await.unwrap(), ScanReport::default());
    }

    #[tokio::test]
    async fn store_outage_aborts_only_this_scan() {
        let f = fixture();
        add(&f.store, "today", 24).await;
        f.store.set_unavailable(true);
        assert!(matches!(
            f.notifier.scan_once().await,
            Err(NotiError::StoreUnavailable(_))
        ));

        f.store.set_unavailable(false);
        assert_eq!(f.notifier.scan_once().await.unwrap().delivered, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_scans_on_every_tick_until_shutdown() {
        let f = fixture();
        add(&f.store, "today", 24).await;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let interval = f.notifier.interval();
        let handle = tokio::spawn(f.notifier.clone().run(shutdown_rx));

        // 1 回目は即時、その後 interval ごと
        tokio::time::sleep(interval * 2 + Duration::from_secs(1)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        assert_eq!(f.sink.sent().len(), 3);
    }
}
