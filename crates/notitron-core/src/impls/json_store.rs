//! JsonFileTaskStore - 単一 JSON ドキュメントに全タスクを保存する store
//!
//! # 実装詳細
//! - ファイル全体を `{"tasks": [...]}` として読み書きする
//! - load → save の間は sidecar `<path>.lock` に排他ロックを取る（bot と CLI が同じファイルを使う）
//! - 書き込みは同じディレクトリの一時ファイルに書いてから rename
//! - 壊れたファイルは空扱いにせず `StoreUnavailable` を返す

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use super::sort_tasks;
use crate::domain::{NewTask, NotiError, Task, TaskId, is_expired};
use crate::ports::{IdGenerator, SystemClock, TaskStore, UlidGenerator};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    tasks: Vec<Task>,
}

pub struct JsonFileTaskStore {
    path: PathBuf,
    // 同一プロセス内の直列化。プロセス間は lock ファイルで守る
    lock: Mutex<()>,
    id_gen: Arc<dyn IdGenerator>,
}

impl JsonFileTaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_id_generator(path, Arc::new(UlidGenerator::new(SystemClock)))
    }

    pub fn with_id_generator(path: impl Into<PathBuf>, id_gen: Arc<dyn IdGenerator>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            id_gen,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ロックを取ったまま document を読み、`mutate` が true を返したら書き戻す
    async fn transact<R, F>(&self, mutate: F) -> Result<R, NotiError>
    where
        F: FnOnce(&mut Document) -> (R, bool) + Send + 'static,
        R: Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let _lock = lock_document(&path)?;
            let mut doc = load(&path)?;
            let (out, dirty) = mutate(&mut doc);
            if dirty {
                save(&path, &doc)?;
            }
            Ok(out)
        })
        .await
        .map_err(|e| NotiError::StoreUnavailable(format!("store task failed: {e}")))?
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// 返した File を drop するとロックも外れる
fn lock_document(path: &Path) -> Result<File, NotiError> {
    let dir = parent_dir(path);
    std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

    let lock_path = lock_path(path);
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|e| io_error(&lock_path, e))?;
    FileExt::lock_exclusive(&file).map_err(|e| io_error(&lock_path, e))?;
    Ok(file)
}

fn load(path: &Path) -> Result<Document, NotiError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::default()),
        Err(e) => return Err(io_error(path, e)),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Document::default());
    }
    serde_json::from_slice(&bytes)
        .map_err(|e| NotiError::StoreUnavailable(format!("corrupt store {}: {e}", path.display())))
}

fn save(path: &Path, doc: &Document) -> Result<(), NotiError> {
    let json = serde_json::to_vec_pretty(doc)
        .map_err(|e| NotiError::StoreUnavailable(format!("encode failed: {e}")))?;

    let dir = parent_dir(path);
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| io_error(dir, e))?;
    tmp.write_all(&json).map_err(|e| io_error(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| io_error(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| io_error(path, e.error))?;
    Ok(())
}

fn io_error(path: &Path, e: std::io::Error) -> NotiError {
    NotiError::StoreUnavailable(format!("{}: {e}", path.display()))
}

#[async_trait]
impl TaskStore for JsonFileTaskStore {
    /// 読めること、かつ書けることを確認する
    async fn ping(&self) -> Result<(), NotiError> {
        self.transact(|_| ((), true)).await
    }

    async fn insert(&self, task: NewTask) -> Result<Task, NotiError> {
        let task = task.with_id(self.id_gen.generate_task_id());
        let stored = task.clone();
        self.transact(move |doc| {
            doc.tasks.push(stored);
            ((), true)
        })
        .await?;
        Ok(task)
    }

    async fn list(&self) -> Result<Vec<Task>, NotiError> {
        let mut tasks = self
            .transact(|doc| (std::mem::take(&mut doc.tasks), false))
            .await?;
        sort_tasks(&mut tasks);
        Ok(tasks)
    }

    async fn get(&self, task_id: TaskId) -> Result<Option<Task>, NotiError> {
        self.transact(move |doc| {
            let found = doc.tasks.iter().find(|t| t.task_id == task_id).cloned();
            (found, false)
        })
        .await
    }

    async fn delete(&self, task_id: TaskId) -> Result<bool, NotiError> {
        self.transact(move |doc| {
            let before = doc.tasks.len();
            doc.tasks.retain(|t| t.task_id != task_id);
            let removed = doc.tasks.len() != before;
            (removed, removed)
        })
        .await
    }

    async fn delete_due_before(&self, cutoff: NaiveDate) -> Result<usize, NotiError> {
        self.transact(move |doc| {
            let before = doc.tasks.len();
            doc.tasks.retain(|t| !is_expired(t.due_date, cutoff));
            let removed = before - doc.tasks.len();
            (removed, removed > 0)
        })
        .await
    }
}
