//! Task domain model.
//!
//! # Responsibility
//! - Define the single persisted entity and its serialized blob shape.
//! - Provide caller-side input normalization for titles and descriptions.
//!
//! # Invariants
//! - `id` is assigned by the backend, never by callers.
//! - New tasks always start with `done == false`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Backend-assigned task identifier.
///
/// Auto-increment row id for SQLite, millisecond timestamp for blob storage.
pub type TaskId = i64;

/// One entry of the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// May be empty.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    /// Creates a not-yet-done task with the given backend-assigned id.
    pub fn new(id: TaskId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            done: false,
        }
    }
}

/// Result of `add_task`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTaskResult {
    pub inserted_id: TaskId,
}

/// Result of `update_task_status`, `update_task` and `delete_task`.
///
/// `rows_affected == 0` means the id did not exist; that is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResult {
    pub rows_affected: u64,
}

impl MutationResult {
    pub fn new(rows_affected: u64) -> Self {
        Self { rows_affected }
    }
}

/// Input validation errors for task drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Normalized title/description pair ready to be handed to a backend.
///
/// Backends accept any text; this type carries the caller-side rule that
/// titles are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: String,
    description: String,
}

impl TaskDraft {
    /// Trims both fields and rejects a blank title.
    pub fn new(title: &str, description: &str) -> Result<Self, TaskValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }

        Ok(Self {
            title: title.to_string(),
            description: description.trim().to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
