//! Storage backends implementing the task CRUD contract.
//!
//! # Responsibility
//! - Define the async `TaskBackend` contract shared by all engines.
//! - Define the labeled error taxonomy surfaced to callers.
//!
//! # Invariants
//! - `fetch_tasks` returns most-recently-created tasks first.
//! - Mutations on an unknown id succeed with `rows_affected == 0`.
//! - Every failure maps to exactly one `StorageErrorKind`.

use crate::db::DbError;
use crate::kv::KvError;
use crate::model::task::{AddTaskResult, MutationResult, Task, TaskId};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod blob;
mod relational;

pub use blob::{BlobStoreBackend, DEFAULT_BLOB_KEY};
pub use relational::{DbLocation, RelationalBackend};

pub type StorageResult<T> = Result<T, StorageError>;

/// Caller-visible failure label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    NotInitialized,
    BackendUnavailable,
    StorageIo,
}

/// Failure surfaced by a backend or the storage facade.
#[derive(Debug)]
pub enum StorageError {
    /// Operation issued before a successful `init()`.
    NotInitialized,
    /// Platform backend could not be resolved.
    BackendUnavailable(String),
    /// SQLite statement failed.
    Db(DbError),
    /// Key-value read or write failed.
    Kv(KvError),
    /// Task list could not be encoded for writing.
    Encode(serde_json::Error),
}

impl StorageError {
    pub fn kind(&self) -> StorageErrorKind {
        match self {
            Self::NotInitialized => StorageErrorKind::NotInitialized,
            Self::BackendUnavailable(_) => StorageErrorKind::BackendUnavailable,
            Self::Db(_) | Self::Kv(_) | Self::Encode(_) => StorageErrorKind::StorageIo,
        }
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "database not initialized"),
            Self::BackendUnavailable(reason) => write!(f, "storage backend unavailable: {reason}"),
            Self::Db(err) => write!(f, "storage io failed: {err}"),
            Self::Kv(err) => write!(f, "storage io failed: {err}"),
            Self::Encode(err) => write!(f, "storage io failed: cannot encode tasks: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotInitialized | Self::BackendUnavailable(_) => None,
            Self::Db(err) => Some(err),
            Self::Kv(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<KvError> for StorageError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

/// Uniform CRUD contract over a concrete storage engine.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    async fn init(&self) -> StorageResult<()>;
    async fn add_task(&self, title: &str, description: &str) -> StorageResult<AddTaskResult>;
    async fn fetch_tasks(&self) -> StorageResult<Vec<Task>>;
    async fn update_task_status(&self, id: TaskId, done: bool) -> StorageResult<MutationResult>;
    async fn update_task(
        &self,
        id: TaskId,
        title: &str,
        description: &str,
    ) -> StorageResult<MutationResult>;
    async fn delete_task(&self, id: TaskId) -> StorageResult<MutationResult>;
}
