//! MessageSink port - リマインダーの送信先
//!
//! 本番は Discord の REST API、テストは RecordingSink。
//! 送信失敗は `NotiError::DeliveryFailure` で返す。呼び出し側（Notifier）が
//! ログに出して次のタスクへ進む。

use async_trait::async_trait;

use crate::domain::{NotiError, Reminder};

#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn deliver(&self, reminder: &Reminder) -> Result<(), NotiError>;
}
