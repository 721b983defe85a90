//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」。Notifier / Cleaner / コマンド処理は
//! ここにある trait だけを見て動く。
//!
//! - TaskStore: ドキュメント DB（本番は JSON ファイル、テストは InMemory）
//! - MessageSink: チャット送信（本番は Discord、テストは RecordingSink）
//! - Clock: 現在時刻（テストは FixedClock）
//! - IdGenerator: レコード ID の採番

pub mod task_store;
pub mod message_sink;
pub mod clock;
pub mod id_generator;

// 主要な trait を再エクスポート
pub use self::task_store::TaskStore;
pub use self::message_sink::MessageSink;
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
