//! Local persistence core for the task list.
//! Backends, backend selection and the facade presentation layers call.

pub mod backend;
pub mod config;
pub mod db;
pub mod kv;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;

pub use backend::{
    BlobStoreBackend, DbLocation, RelationalBackend, StorageError, StorageErrorKind,
    StorageResult, TaskBackend,
};
pub use config::StorageConfig;
pub use kv::{FileKeyValueStore, KeyValueStore, KvError, MemoryKeyValueStore};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{
    AddTaskResult, MutationResult, Task, TaskDraft, TaskId, TaskValidationError,
};
pub use service::task_service::{TaskService, TaskServiceError, TaskServiceResult};
pub use storage::{BackendResolver, Platform, PlatformResolver, TaskStorage};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
