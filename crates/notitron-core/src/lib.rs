//! notitron-core
//!
//! 課題リマインダー bot のコア。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（TaskId, Task, 期日パース, Urgency, Reminder, NotiError）
//! - **ports**: 抽象化レイヤー（TaskStore, MessageSink, Clock, IdGenerator）
//! - **impls**: 実装（InMemoryTaskStore, JsonFileTaskStore, RecordingSink）
//! - **app**: アプリケーションロジック（TaskService, CommandHandler, NotifierLoop, CleanerLoop）
//! - **config**: 設定（タイムゾーン、タイマー間隔、store、Discord）

pub mod domain;
pub mod ports;
pub mod impls;
pub mod app;
pub mod config;
