//! InMemoryTaskStore - 開発・テスト用の store
//!
//! # 実装詳細
//! - HashMap<TaskId, Task> を tokio の Mutex で保護
//! - ロックは各メソッド内で完結（ロックを跨いで await しない）
//! - `set_unavailable(true)` で障害を注入できる

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use super::sort_tasks;
use crate::domain::{NewTask, NotiError, Task, TaskId, is_expired};
use crate::ports::{IdGenerator, SystemClock, TaskStore, UlidGenerator};

pub struct InMemoryTaskStore {
    tasks: Mutex<HashMap<TaskId, Task>>,
    id_gen: Arc<dyn IdGenerator>,
    unavailable: AtomicBool,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::with_id_generator(Arc::new(UlidGenerator::new(SystemClock)))
    }

    pub fn with_id_generator(id_gen: Arc<dyn IdGenerator>) -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
            id_gen,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail with `StoreUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.tasks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.lock().await.is_empty()
    }

    fn check_available(&self) -> Result<(), NotiError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(NotiError::StoreUnavailable("in-memory store marked unavailable".into()));
        }
        Ok(())
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn ping(&self) -> Result<(), NotiError> {
        self.check_available()
    }

    async fn insert(&self, task: NewTask) -> Result<Task, NotiError> {
        self.check_available()?;
        let task = task.with_id(self.id_gen.generate_task_id());
        self.tasks.lock().await.insert(task.task_id, task.clone());
        Ok(task)
    }

    async fn list(&self) -> Result<Vec<Task>, NotiError> {
        self.check_available()?;
        let mut tasks: Vec<Task> = self.tasks.lock().await.values().cloned().collect();
        sort_tasks(&mut tasks);
        Ok(tasks)
    }

    async fn get(&self, task_id: TaskId) -> Result<Option<Task>, NotiError> {
        self.check_available()?;
        Ok(self.tasks.lock().await.get(&task_id).cloned())
    }

    async fn delete(&self, task_id: TaskId) -> Result<bool, NotiError> {
        self.check_available()?;
        Ok(self.tasks.lock().await.remove(&task_id).is_some())
    }

    async fn delete_due_before(&self, cutoff: NaiveDate) -> Result<usize, NotiError> {
        self.check_available()?;
        let mut tasks = self.tasks.lock().await;
        let before = tasks.len();
        tasks.retain(|_, t| !is_expired(t.due_date, cutoff));
        Ok(before - tasks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use chrono::{TimeZone, Utc};

    fn new_task(user: &str, due: (i32, u32, u32)) -> NewTask {
        NewTask {
            user_id: UserId::new(user),
            channel_id: None,
            class_name: "CS101".into(),
            assignment_name: "HW".into(),
            due_date: NaiveDate::from_ymd_opt(due.0, due.1, due.2).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids_for_identical_content() {
        let store = InMemoryTaskStore::new();
        let a = store.insert(new_task("1", (2024, 12, 25))).await.unwrap();
        let b = store.insert(new_task("1", (2024, 12, 25))).await.unwrap();

        assert_ne!(a.task_id, b.task_id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn list_is_ordered_by_due_date() {
        let store = InMemoryTaskStore::new();
        store.insert(new_task("1", (2024, 12, 30))).await.unwrap();
        store.insert(new_task("1", (2024, 12, 20))).await.unwrap();
        store.insert(new_task("1", (2024, 12, 25))).await.unwrap();

        let days: Vec<u32> = store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|t| chrono::Datelike::day(&t.due_date))
            .collect();
        assert_eq!(days, vec![20, 25, 30]);
    }

    #[tokio::test]
    async fn list_for_user_filters_by_owner() {
        let store = InMemoryTaskStore::new();
        store.insert(new_task("1", (2024, 12, 25))).await.unwrap();
        store.insert(new_task("2", (2024, 12, 25))).await.unwrap();

        let mine = store.list_for_user(&UserId::new("1")).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].user_id, UserId::new("1"));
    }

    #[tokio::test]
    async fn delete_due_before_keeps_the_cutoff_day() {
        let store = InMemoryTaskStore::new();
        store.insert(new_task("1", (2024, 12, 23))).await.unwrap();
        let today = store.insert(new_task("1", (2024, 12, 24))).await.unwrap();

        let removed = store
            .delete_due_before(NaiveDate::from_ymd_opt(2024, 12, 24).unwrap())
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert_eq!(store.list().await.unwrap(), vec![today]);
    }

    #[tokio::test]
    async fn delete_reports_missing_records() {
        let store = InMemoryTaskStore::new();
        let task = store.insert(new_task("1", (2024, 12, 25))).await.unwrap();

        assert!(store.delete(task.task_id).await.unwrap());
        assert!(!store.delete(task.task_id).await.unwrap());
        assert_eq!(store.get(task.task_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = InMemoryTaskStore::new();
        store.set_unavailable(true);

        assert!(matches!(store.ping().await, Err(NotiError::StoreUnavailable(_))));
        assert!(matches!(
            store.insert(new_task("1", (2024, 12, 25))).await,
            Err(NotiError::StoreUnavailable(_))
        ));
        assert!(matches!(store.list().await, Err(NotiError::StoreUnavailable(_))));
    }
}
