//! TaskService - ユーザー操作（追加・完了・一覧）
//!
//! コマンド層から呼ばれる。検証 → store 書き込みまでを担当する。

use std::sync::Arc;

use tracing::{debug, info};

use super::validator::{TaskInput, TaskValidator};
use crate::domain::{ChannelId, NotiError, Task, TaskId, UserId};
use crate::ports::{Clock, TaskStore};

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Validate and persist. Nothing is written when validation fails.
    pub async fn add_task(
        &self,
        user_id: UserId,
        channel_id: Option<ChannelId>,
        input: TaskInput<'_>,
    ) -> Result<Task, NotiError> {
        let new_task = TaskValidator::validate(user_id, channel_id, input, self.clock.now())?;
        let task = self.store.insert(new_task).await?;
        info!(
            task_id = %task.task_id,
            user_id = %task.user_id,
            due_date = %task.due_date,
            "task added"
        );
        Ok(task)
    }

    /// Delete a task on behalf of its owner.
    pub async fn complete_task(&self, user_id: &UserId, task_id: TaskId) -> Result<Task, NotiError> {
        let task = self
            .store
            .get(task_id)
            .await?
            .ok_or(NotiError::TaskNotFound(task_id))?;
        if !task.is_owned_by(user_id) {
            debug!(%task_id, %user_id, "complete rejected: not owner");
            return Err(NotiError::NotOwner(task_id));
        }
        // 同時に Cleaner が消していた場合も「見つからない」として扱う
        if !self.store.delete(task_id).await? {
            return Err(NotiError::TaskNotFound(task_id));
        }
        info!(%task_id, %user_id, "task completed");
        Ok(task)
    }

    pub async fn list_tasks(&self, user_id: &UserId) -> Result<Vec<Task>, NotiError> {
        self.store.list_for_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::InMemoryTaskStore;
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};

    fn service() -> (TaskService, Arc<InMemoryTaskStore>) {
        let store = Arc::new(InMemoryTaskStore::new());
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 12, 24, 12, 0, 0).unwrap(),
        ));
        (TaskService::new(store.clone(), clock), store)
    }

    fn input<'a>(due: &'a str) -> TaskInput<'a> {
        TaskInput {
            class_name: "CS101",
            assignment_name: "HW3",
            due_date: due,
        }
    }

    #[tokio::test]
    async fn invalid_input_creates_no_record() {
        let (service, store) = service();

        let err = service
            .add_task(UserId::new("1"), None, input("13/40/24"))
            .await
            .unwrap_err();

        assert!(matches!(err, NotiError::InvalidDateFormat(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn duplicate_submissions_are_separate_records() {
        let (service, store) = service();
        let user = UserId::new("1");

        service.add_task(user.clone(), None, input("12/25/24")).await.unwrap();
        service.add_task(user.clone(), None, input("12/25/2024")).await.unwrap();

        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn owner_can_complete() {
        let (service, store) = service();
        let user = UserId::new("1");
        let task = service.add_task(user.clone(), None, input("12/25/24")).await.unwrap();

        let done = service.complete_task(&user, task.task_id).await.unwrap();

        assert_eq!(done.task_id, task.task_id);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn other_users_cannot_complete() {
        let (service, store) = service();
        let task = service
            .add_task(UserId::new("1"), None, input("12/25/24"))
            .await
            .unwrap();

        let err = service
            .complete_task(&UserId::new("2"), task.task_id)
            .await
            .unwrap_err();

        assert!(matches!(err, NotiError::NotOwner(id) if id == task.task_id));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn completing_unknown_task_is_not_found() {
        let (service, _store) = service();
        let id = TaskId::from_ulid(ulid::Ulid::new());

        let err = service.complete_task(&UserId::new("1"), id).await.unwrap_err();
        assert!(matches!(err, NotiError::TaskNotFound(_)));
    }

    #[tokio::test]
    async fn store_outage_surfaces_as_store_unavailable() {
        let (service, store) = service();
        store.set_unavailable(true);

        let err = service
            .add_task(UserId::new("1"), None, input("12/25/24"))
            .await
            .unwrap_err();
        assert!(matches!(err, NotiError::StoreUnavailable(_)));
    }
}
