//! RecordingSink - 送信内容を記録するだけの sink
//!
//! テストと `notitron scan --dry-run` で使う。
//! `fail_for` に登録した task_id への送信は `DeliveryFailure` になる。

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{NotiError, Reminder, TaskId};
use crate::ports::MessageSink;

#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<Reminder>>,
    failing: Mutex<HashSet<TaskId>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliveries for `task_id` fail from now on.
    pub fn fail_for(&self, task_id: TaskId) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(task_id);
    }

    /// Everything delivered so far, in order.
    pub fn sent(&self) -> Vec<Reminder> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn deliver(&self, reminder: &Reminder) -> Result<(), NotiError> {
        let failing = self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&reminder.task_id);
        if failing {
            return Err(NotiError::DeliveryFailure(format!(
                "injected failure for {}",
                reminder.task_id
            )));
        }
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(reminder.clone());
        Ok(())
    }
}
