//! In-process key-value store.

use super::{KeyValueStore, KvResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get_item(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> KvResult<()> {
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKeyValueStore;
    use crate::kv::KeyValueStore;

    #[tokio::test]
    async fn missing_key_reads_as_none_and_writes_overwrite() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get_item("tasks").await.unwrap(), None);

        store.set_item("tasks", "[]").await.unwrap();
        store.set_item("tasks", "[1]").await.unwrap();
        assert_eq!(store.get_item("tasks").await.unwrap().as_deref(), Some("[1]"));
    }
}
