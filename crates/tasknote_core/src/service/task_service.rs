//! Task use-case service.
//!
//! # Responsibility
//! - Provide the list-screen flows (create, edit, toggle, remove) on top of
//!   any `TaskBackend`, usually the `TaskStorage` facade.
//!
//! # Invariants
//! - Titles reaching storage are trimmed and non-empty.
//! - Status changes and title/description edits are separate calls.

use crate::backend::{StorageError, TaskBackend};
use crate::model::task::{
    AddTaskResult, MutationResult, Task, TaskDraft, TaskId, TaskValidationError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

#[derive(Debug)]
pub enum TaskServiceError {
    Validation(TaskValidationError),
    Storage(StorageError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for TaskServiceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

pub struct TaskService<B: TaskBackend> {
    backend: B,
}

impl<B: TaskBackend> TaskService<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Prepares storage for use. Must precede every other call.
    pub async fn start(&self) -> TaskServiceResult<()> {
        Ok(self.backend.init().await?)
    }

    /// Lists tasks, newest first.
    pub async fn list_tasks(&self) -> TaskServiceResult<Vec<Task>> {
        Ok(self.backend.fetch_tasks().await?)
    }

    /// Creates a task from raw user input.
    pub async fn create_task(
        &self,
        title: &str,
        description: &str,
    ) -> TaskServiceResult<AddTaskResult> {
        let draft = TaskDraft::new(title, description)?;
        Ok(self
            .backend
            .add_task(draft.title(), draft.description())
            .await?)
    }

    /// Replaces title and description from raw user input.
    pub async fn edit_task(
        &self,
        id: TaskId,
        title: &str,
        description: &str,
    ) -> TaskServiceResult<MutationResult> {
        let draft = TaskDraft::new(title, description)?;
        Ok(self
            .backend
            .update_task(id, draft.title(), draft.description())
            .await?)
    }

    /// Flips `done` for `id`. An unknown id affects no rows.
    pub async fn toggle_task(&self, id: TaskId) -> TaskServiceResult<MutationResult> {
        let tasks = self.backend.fetch_tasks().await?;
        let Some(task) = tasks.iter().find(|task| task.id == id) else {
            return Ok(MutationResult::new(0));
        };
        Ok(self.backend.update_task_status(id, !task.done).await?)
    }

    pub async fn remove_task(&self, id: TaskId) -> TaskServiceResult<MutationResult> {
        Ok(self.backend.delete_task(id).await?)
    }
}
