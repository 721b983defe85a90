//! TaskStore port - タスクレコードの正本（source of truth）
//!
//! # 設計原則
//! - 各メソッドは 1 回の呼び出しで完結する（レコード単位でアトミック）
//! - 内容による重複排除はしない。同じ内容でも別レコードになる
//! - 障害はすべて `NotiError::StoreUnavailable` で返す

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{NewTask, NotiError, Task, TaskId, UserId};

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Connectivity probe used at startup.
    async fn ping(&self) -> Result<(), NotiError>;

    /// Persist a validated task and assign it a record id.
    async fn insert(&self, task: NewTask) -> Result<Task, NotiError>;

    /// All tasks, ordered by due date then id.
    async fn list(&self) -> Result<Vec<Task>, NotiError>;

    /// Tasks owned by `user`, ordered by due date then id.
    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Task>, NotiError> {
        let mut tasks = self.list().await?;
        tasks.retain(|t| t.is_owned_by(user));
        Ok(tasks)
    }

    async fn get(&self, task_id: TaskId) -> Result<Option<Task>, NotiError>;

    /// Delete one record. Returns whether it existed.
    async fn delete(&self, task_id: TaskId) -> Result<bool, NotiError>;

    /// Delete every task with `due_date < cutoff`. Returns the number removed.
    async fn delete_due_before(&self, cutoff: NaiveDate) -> Result<usize, NotiError>;
}
