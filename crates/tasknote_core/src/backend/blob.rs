//! Blob-store backend: the whole task list serialized under one key.
//!
//! # Responsibility
//! - Persist tasks as one JSON array in a `KeyValueStore`.
//! - Serve as the web backend and as the relational fallback target.
//!
//! # Invariants
//! - The stored array is kept newest-first; new tasks are prepended.
//! - Ids are strictly increasing within one store.
//! - Read-modify-write cycles run one at a time, in arrival order.

use super::{StorageError, StorageResult, TaskBackend};
use crate::kv::KeyValueStore;
use crate::model::task::{AddTaskResult, MutationResult, Task, TaskId};
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

pub const DEFAULT_BLOB_KEY: &str = "tasks";

pub struct BlobStoreBackend {
    store: Arc<dyn KeyValueStore>,
    key: String,
    // Tokio's mutex is FIFO, which gives arrival-order queuing of writers.
    write_lock: Mutex<()>,
}

impl BlobStoreBackend {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads the list for a mutation. Store IO failures are surfaced; a
    /// corrupt blob is treated as an empty list.
    async fn load_for_write(&self) -> StorageResult<Vec<Task>> {
        let raw = self.store.get_item(&self.key).await?;
        Ok(raw.map(|blob| self.decode(&blob)).unwrap_or_default())
    }

    fn decode(&self, blob: &str) -> Vec<Task> {
        match serde_json::from_str(blob) {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(
                    "event=blob_decode module=blob status=error key={} bytes={} error={}",
                    self.key,
                    blob.len(),
                    err
                );
                Vec::new()
            }
        }
    }

    async fn save(&self, tasks: &[Task]) -> StorageResult<()> {
        let blob = serde_json::to_string(tasks).map_err(StorageError::Encode)?;
        self.store.set_item(&self.key, &blob).await?;
        debug!(
            "event=blob_save module=blob status=ok key={} count={}",
            self.key,
            tasks.len()
        );
        Ok(())
    }

    /// Applies `apply` to every task with `id`; writes back only on a match.
    async fn modify_matching(
        &self,
        id: TaskId,
        apply: impl Fn(&mut Task) + Send,
    ) -> StorageResult<MutationResult> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.load_for_write().await?;

        let mut matched = 0;
        for task in tasks.iter_mut().filter(|task| task.id == id) {
            apply(task);
            matched += 1;
        }

        if matched > 0 {
            self.save(&tasks).await?;
        }
        Ok(MutationResult::new(matched))
    }
}

#[async_trait]
impl TaskBackend for BlobStoreBackend {
    async fn init(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn add_task(&self, title: &str, description: &str) -> StorageResult<AddTaskResult> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.load_for_write().await?;

        let id = next_task_id(&tasks, current_time_millis());
        tasks.insert(0, Task::new(id, title, description));
        self.save(&tasks).await?;

        Ok(AddTaskResult { inserted_id: id })
    }

    async fn fetch_tasks(&self) -> StorageResult<Vec<Task>> {
        match self.store.get_item(&self.key).await {
            Ok(Some(blob)) => Ok(self.decode(&blob)),
            Ok(None) => Ok(Vec::new()),
            Err(err) => {
                warn!(
                    "event=blob_read module=blob status=error key={} error={}",
                    self.key, err
                );
                Ok(Vec::new())
            }
        }
    }

    async fn update_task_status(&self, id: TaskId, done: bool) -> StorageResult<MutationResult> {
        self.modify_matching(id, |task| task.done = done).await
    }

    async fn update_task(
        &self,
        id: TaskId,
        title: &str,
        description: &str,
    ) -> StorageResult<MutationResult> {
        self.modify_matching(id, |task| {
            task.title = title.to_string();
            task.description = description.to_string();
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> StorageResult<MutationResult> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.load_for_write().await?;

        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        let removed = (before - tasks.len()) as u64;

        if removed > 0 {
            self.save(&tasks).await?;
        }
        Ok(MutationResult::new(removed))
    }
}

/// Timestamp-derived id, bumped past the current maximum so rapid inserts
/// within one clock tick stay unique and ordered.
fn next_task_id(tasks: &[Task], now_millis: i64) -> TaskId {
    let highest = tasks.iter().map(|task| task.id).max();
    match highest {
        Some(highest) if highest >= now_millis => highest + 1,
        _ => now_millis,
    }
}

fn current_time_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
