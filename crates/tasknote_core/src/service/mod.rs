//! Core use-case services.
//!
//! # Responsibility
//! - Apply caller-side input rules before forwarding to storage.
//! - Keep presentation layers decoupled from storage details.

pub mod task_service;
