//! SQLite backend with one-way degradation to blob storage.
//!
//! # Responsibility
//! - Serve task CRUD from the `tasks` table using bound parameters only.
//! - Switch permanently to the blob-store fallback when `init()` cannot open
//!   the database or create the table.
//!
//! # Invariants
//! - State moves `Uninitialized -> Ready | Degraded` and never back.
//! - The state lives behind one mutex, so every call observes the switch.
//! - `done` is stored as `0/1` and converted to `bool` before leaving here.

use super::blob::BlobStoreBackend;
use super::{StorageError, StorageResult, TaskBackend};
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::task::{AddTaskResult, MutationResult, Task, TaskId};
use async_trait::async_trait;
use log::{info, warn};
use rusqlite::{params, Connection, Row};
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Where the SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    Memory,
}

enum RelationalState {
    Uninitialized,
    Ready(Connection),
    Degraded,
}

pub struct RelationalBackend {
    location: DbLocation,
    state: Mutex<RelationalState>,
    fallback: BlobStoreBackend,
}

impl RelationalBackend {
    pub fn new(location: DbLocation, fallback: BlobStoreBackend) -> Self {
        Self {
            location,
            state: Mutex::new(RelationalState::Uninitialized),
            fallback,
        }
    }

    /// Returns whether `init()` failed over to blob storage.
    pub async fn is_degraded(&self) -> bool {
        matches!(*self.state.lock().await, RelationalState::Degraded)
    }

    fn open(&self) -> DbResult<Connection> {
        match &self.location {
            DbLocation::File(path) => open_db(path),
            DbLocation::Memory => open_db_in_memory(),
        }
    }

    /// Runs `op` against the live connection.
    ///
    /// Returns `Ok(None)` in degraded mode so the caller forwards to the
    /// fallback after the state lock has been released.
    async fn with_connection<T, F>(&self, op: F) -> StorageResult<Option<T>>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send,
        T: Send,
    {
        let state = self.state.lock().await;
        match &*state {
            RelationalState::Uninitialized => Err(StorageError::NotInitialized),
            RelationalState::Degraded => Ok(None),
            RelationalState::Ready(conn) => Ok(Some(op(conn)?)),
        }
    }
}

#[async_trait]
impl TaskBackend for RelationalBackend {
    async fn init(&self) -> StorageResult<()> {
        let mut state = self.state.lock().await;
        if !matches!(*state, RelationalState::Uninitialized) {
            return Ok(());
        }

        match self.open() {
            Ok(conn) => {
                info!("event=backend_init module=relational status=ok mode=sqlite");
                *state = RelationalState::Ready(conn);
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=backend_init module=relational status=degraded fallback=blob key={} error={}",
                    self.fallback.key(),
                    err
                );
                *state = RelationalState::Degraded;
                drop(state);
                self.fallback.init().await
            }
        }
    }

    async fn add_task(&self, title: &str, description: &str) -> StorageResult<AddTaskResult> {
        let inserted = self
            .with_connection(|conn| insert_task(conn, title, description))
            .await?;
        match inserted {
            Some(inserted_id) => Ok(AddTaskResult { inserted_id }),
            None => self.fallback.add_task(title, description).await,
        }
    }

    async fn fetch_tasks(&self) -> StorageResult<Vec<Task>> {
        match self.with_connection(select_tasks).await? {
            Some(tasks) => Ok(tasks),
            None => self.fallback.fetch_tasks().await,
        }
    }

    async fn update_task_status(&self, id: TaskId, done: bool) -> StorageResult<MutationResult> {
        let changed = self
            .with_connection(|conn| {
                conn.execute(
                    "UPDATE tasks SET done = ?1 WHERE id = ?2;",
                    params![bool_to_int(done), id],
                )
            })
            .await?;
        match changed {
            Some(rows) => Ok(MutationResult::new(rows as u64)),
            None => self.fallback.update_task_status(id, done).await,
        }
    }

    async fn update_task(
        &self,
        id: TaskId,
        title: &str,
        description: &str,
    ) -> StorageResult<MutationResult> {
        let changed = self
            .with_connection(|conn| {
                conn.execute(
                    "UPDATE tasks SET title = ?1, description = ?2 WHERE id = ?3;",
                    params![title, description, id],
                )
            })
            .await?;
        match changed {
            Some(rows) => Ok(MutationResult::new(rows as u64)),
            None => self.fallback.update_task(id, title, description).await,
        }
    }

    async fn delete_task(&self, id: TaskId) -> StorageResult<MutationResult> {
        let changed = self
            .with_connection(|conn| conn.execute("DELETE FROM tasks WHERE id = ?1;", [id]))
            .await?;
        match changed {
            Some(rows) => Ok(MutationResult::new(rows as u64)),
            None => self.fallback.delete_task(id).await,
        }
    }
}

fn insert_task(conn: &Connection, title: &str, description: &str) -> rusqlite::Result<TaskId> {
    conn.execute(
        "INSERT INTO tasks (title, description, done) VALUES (?1, ?2, 0);",
        params![title, description],
    )?;
    Ok(conn.last_insert_rowid())
}

fn select_tasks(conn: &Connection) -> rusqlite::Result<Vec<Task>> {
    let mut stmt =
        conn.prepare_cached("SELECT id, title, description, done FROM tasks ORDER BY id DESC;")?;
    let rows = stmt.query_map([], parse_task_row)?;
    rows.collect()
}

fn parse_task_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row
            .get::<_, Option<String>>("description")?
            .unwrap_or_default(),
        done: row.get::<_, i64>("done")? != 0,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
