//! Impls - ports の実装
//!
//! - **InMemoryTaskStore**: テスト・開発用の store
//! - **JsonFileTaskStore**: 単一 JSON ドキュメントに保存する本番用 store
//! - **RecordingSink**: 送信内容を記録するテスト用 sink（失敗注入つき）
//!
//! Discord への送信は `notitron-cli` 側に置く。

pub mod inmem_store;
pub mod json_store;
pub mod recording_sink;

// 主要な型を再エクスポート
pub use self::inmem_store::InMemoryTaskStore;
pub use self::json_store::JsonFileTaskStore;
pub use self::recording_sink::RecordingSink;

use crate::domain::Task;

/// Order used by every `TaskStore::list` implementation.
pub(crate) fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| (t.due_date, t.task_id));
}
