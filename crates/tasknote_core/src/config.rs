//! Storage configuration.
//!
//! # Invariants
//! - `data_dir` holds both the SQLite file and the blob-store files.
//! - Defaults match the on-disk names earlier app versions used.

use crate::backend::DEFAULT_BLOB_KEY;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_DB_FILE_NAME: &str = "tasks.db";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    #[serde(default = "default_db_file_name")]
    pub db_file_name: String,
    #[serde(default = "default_blob_key")]
    pub blob_key: String,
}

impl StorageConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            db_file_name: default_db_file_name(),
            blob_key: default_blob_key(),
        }
    }

    /// Full path of the SQLite database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    /// Returns a description of the first invalid field, if any.
    pub fn validate(&self) -> Result<(), String> {
        if self.data_dir.as_os_str().is_empty() {
            return Err("data_dir cannot be empty".to_string());
        }
        if self.db_file_name.trim().is_empty() {
            return Err("db_file_name cannot be empty".to_string());
        }
        if self.blob_key.trim().is_empty() {
            return Err("blob_key cannot be empty".to_string());
        }
        Ok(())
    }
}

fn default_db_file_name() -> String {
    DEFAULT_DB_FILE_NAME.to_string()
}

fn default_blob_key() -> String {
    DEFAULT_BLOB_KEY.to_string()
}
