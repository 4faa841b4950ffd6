//! Task record model shared by every storage backend.
//!
//! # Responsibility
//! - Define the canonical `Task` shape returned to presentation callers.
//! - Define typed result envelopes for mutating operations.
//!
//! # Invariants
//! - `done` is always a concrete boolean once a task has been read.
//! - Backend-specific encodings (e.g. SQLite `0/1`) never leak past a backend.

pub mod task;
