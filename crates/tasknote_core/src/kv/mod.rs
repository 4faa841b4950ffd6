//! Key-value storage substrate for the blob-store backend.
//!
//! # Responsibility
//! - Abstract the platform key-value store behind an async string API.
//! - Provide a file-backed store for native hosts and an in-process store.
//!
//! # Invariants
//! - A value written under a key is returned unchanged by the next read.
//! - Missing keys read as `None`, never as an error.

use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod file_store;
mod memory_store;

pub use file_store::FileKeyValueStore;
pub use memory_store::MemoryKeyValueStore;

pub type KvResult<T> = Result<T, KvError>;

#[derive(Debug)]
pub enum KvError {
    /// Key cannot be mapped to a storage slot.
    InvalidKey(String),
    Io {
        key: String,
        source: std::io::Error,
    },
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "invalid storage key: `{key}`"),
            Self::Io { key, source } => write!(f, "storage io failed for key `{key}`: {source}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidKey(_) => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Async string key-value store, the Rust face of a platform "async storage".
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_item(&self, key: &str) -> KvResult<Option<String>>;
    async fn set_item(&self, key: &str, value: &str) -> KvResult<()>;
}
