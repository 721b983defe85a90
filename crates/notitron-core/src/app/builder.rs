//! AppBuilder - ports のワイヤリング
//!
//! # Fail-fast 設計
//! - store と sink は必須。足りなければ build() が BuildError を返す
//! - clock は省略時 SystemClock
//! - start() の前に store.ping() を通す（接続できなければ起動しない）

use std::sync::Arc;

use tracing::info;

use super::{CleanerLoop, CommandHandler, LoopGroup, NotifierLoop, TaskService};
use crate::config::{DEFAULT_PREFIX, ScheduleConfig};
use crate::domain::NotiError;
use crate::ports::{Clock, MessageSink, SystemClock, TaskStore};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no task store configured")]
    MissingStore,

    #[error("no message sink configured")]
    MissingSink,
}

/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .store(Arc::new(JsonFileTaskStore::new(&config.store.path)))
///     .sink(discord.clone())
///     .schedule(config.schedule())
///     .build()?;
/// app.check_store().await?;
/// let loops = app.start();
/// ```
pub struct AppBuilder {
    store: Option<Arc<dyn TaskStore>>,
    sink: Option<Arc<dyn MessageSink>>,
    clock: Arc<dyn Clock>,
    schedule: ScheduleConfig,
    prefix: String,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            sink: None,
            clock: Arc::new(SystemClock),
            schedule: ScheduleConfig::default(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    pub fn store(mut self, store: Arc<dyn TaskStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn MessageSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn schedule(mut self, schedule: ScheduleConfig) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn command_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn build(self) -> Result<App, BuildError> {
        let store = self.store.ok_or(BuildError::MissingStore)?;
        let sink = self.sink.ok_or(BuildError::MissingSink)?;

        let service = TaskService::new(store.clone(), self.clock.clone());
        Ok(App {
            commands: CommandHandler::new(service.clone(), self.prefix),
            notifier: NotifierLoop::new(store.clone(), sink, self.clock.clone(), &self.schedule),
            cleaner: CleanerLoop::new(store.clone(), self.clock, &self.schedule),
            service,
            store,
            schedule: self.schedule,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 組み立て済みのアプリケーション
pub struct App {
    pub service: TaskService,
    pub commands: CommandHandler,
    pub notifier: NotifierLoop,
    pub cleaner: CleanerLoop,
    store: Arc<dyn TaskStore>,
    schedule: ScheduleConfig,
}

impl App {
    /// Startup connectivity check. Failure here should halt the process.
    pub async fn check_store(&self) -> Result<(), NotiError> {
        self.store.ping().await
    }

    pub fn schedule(&self) -> &ScheduleConfig {
        &self.schedule
    }

    /// Spawn the notifier and cleaner loops.
    pub fn start(&self) -> LoopGroup {
        info!(
            timezone = %self.schedule.timezone,
            reminder_interval_secs = self.schedule.reminder_interval.as_secs(),
            cleanup_interval_secs = self.schedule.cleanup_interval.as_secs(),
            "starting background loops"
        );
        LoopGroup::spawn(self.notifier.clone(), self.cleaner.clone())
    }
}
