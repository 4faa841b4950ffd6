//! Backend selection and the storage facade.
//!
//! # Responsibility
//! - Resolve the platform backend once, on first use.
//! - Forward every CRUD call to the resolved backend and log failures.
//!
//! # Invariants
//! - Concurrent first calls share one in-flight resolution.
//! - A failed resolution is not cached; the next call resolves again.
//! - The facade never substitutes an in-memory backend on failure.

use crate::backend::{
    BlobStoreBackend, DbLocation, RelationalBackend, StorageError, StorageResult, TaskBackend,
};
use crate::config::StorageConfig;
use crate::kv::{FileKeyValueStore, KeyValueStore};
use crate::model::task::{AddTaskResult, MutationResult, Task, TaskId};
use async_trait::async_trait;
use log::{error, info, warn};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Host platform family used for backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Native,
    Web,
}

impl Platform {
    /// Platform of the current compile target.
    pub fn current() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::Web
        } else {
            Self::Native
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Web => "web",
        }
    }
}

/// Strategy that produces the backend the facade delegates to.
#[async_trait]
pub trait BackendResolver: Send + Sync {
    async fn resolve(&self) -> StorageResult<Arc<dyn TaskBackend>>;
}

/// Default resolver: SQLite on native hosts, blob storage on the web.
pub struct PlatformResolver {
    platform: Platform,
    config: StorageConfig,
    kv_store: Arc<dyn KeyValueStore>,
}

impl PlatformResolver {
    /// Uses a file-backed key-value store inside `config.data_dir`.
    pub fn new(platform: Platform, config: StorageConfig) -> Self {
        let kv_store = Arc::new(FileKeyValueStore::new(config.data_dir.clone()));
        Self {
            platform,
            config,
            kv_store,
        }
    }

    /// Replaces the key-value store used for blob storage and fallback.
    pub fn with_kv_store(mut self, kv_store: Arc<dyn KeyValueStore>) -> Self {
        self.kv_store = kv_store;
        self
    }
}

#[async_trait]
impl BackendResolver for PlatformResolver {
    async fn resolve(&self) -> StorageResult<Arc<dyn TaskBackend>> {
        self.config
            .validate()
            .map_err(StorageError::BackendUnavailable)?;

        let blob = BlobStoreBackend::new(self.kv_store.clone(), self.config.blob_key.clone());
        let backend: Arc<dyn TaskBackend> = match self.platform {
            Platform::Web => Arc::new(blob),
            Platform::Native => {
                let db_path = self.config.db_path();
                prepare_db_dir(&db_path).await;
                Arc::new(RelationalBackend::new(DbLocation::File(db_path), blob))
            }
        };

        info!(
            "event=backend_resolve module=storage status=ok platform={}",
            self.platform.as_str()
        );
        Ok(backend)
    }
}

/// Creates the database directory so a first run opens SQLite instead of
/// degrading. A failure here is left for `init()` to degrade on.
async fn prepare_db_dir(db_path: &Path) {
    let Some(dir) = db_path.parent() else {
        return;
    };
    if let Err(err) = tokio::fs::create_dir_all(dir).await {
        warn!(
            "event=backend_resolve module=storage status=warn dir={} error={}",
            dir.display(),
            err
        );
    }
}

/// Single entry point for presentation callers.
pub struct TaskStorage {
    resolver: Box<dyn BackendResolver>,
    backend: OnceCell<Arc<dyn TaskBackend>>,
}

impl TaskStorage {
    pub fn new(resolver: impl BackendResolver + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
            backend: OnceCell::new(),
        }
    }

    /// Facade over the default resolver for `platform`.
    pub fn for_platform(platform: Platform, config: StorageConfig) -> Self {
        Self::new(PlatformResolver::new(platform, config))
    }

    /// Returns whether a backend has been resolved yet.
    pub fn is_resolved(&self) -> bool {
        self.backend.initialized()
    }

    async fn backend(&self) -> StorageResult<&Arc<dyn TaskBackend>> {
        self.backend
            .get_or_try_init(|| self.resolver.resolve())
            .await
    }
}

fn log_failure(operation: &'static str) -> impl Fn(StorageError) -> StorageError {
    move |err| {
        error!(
            "event={} module=storage status=error kind={:?} error={}",
            operation,
            err.kind(),
            err
        );
        err
    }
}

#[async_trait]
impl TaskBackend for TaskStorage {
    async fn init(&self) -> StorageResult<()> {
        let backend = self.backend().await.map_err(log_failure("storage_init"))?;
        backend.init().await.map_err(log_failure("storage_init"))
    }

    async fn add_task(&self, title: &str, description: &str) -> StorageResult<AddTaskResult> {
        let backend = self.backend().await.map_err(log_failure("task_add"))?;
        backend
            .add_task(title, description)
            .await
            .map_err(log_failure("task_add"))
    }

    async fn fetch_tasks(&self) -> StorageResult<Vec<Task>> {
        let backend = self.backend().await.map_err(log_failure("task_fetch"))?;
        backend.fetch_tasks().await.map_err(log_failure("task_fetch"))
    }

    async fn update_task_status(&self, id: TaskId, done: bool) -> StorageResult<MutationResult> {
        let backend = self
            .backend()
            .await
            .map_err(log_failure("task_update_status"))?;
        backend
            .update_task_status(id, done)
            .await
            .map_err(log_failure("task_update_status"))
    }

    async fn update_task(
        &self,
        id: TaskId,
        title: &str,
        description: &str,
    ) -> StorageResult<MutationResult> {
        let backend = self.backend().await.map_err(log_failure("task_update"))?;
        backend
            .update_task(id, title, description)
            .await
            .map_err(log_failure("task_update"))
    }

    async fn delete_task(&self, id: TaskId) -> StorageResult<MutationResult> {
        let backend = self.backend().await.map_err(log_failure("task_delete"))?;
        backend
            .delete_task(id)
            .await
            .map_err(log_failure("task_delete"))
    }
}
