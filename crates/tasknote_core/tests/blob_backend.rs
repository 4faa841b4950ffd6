use async_trait::async_trait;
use std::sync::Arc;
use tasknote_core::kv::KvResult;
use tasknote_core::{
    BlobStoreBackend, FileKeyValueStore, KeyValueStore, KvError, MemoryKeyValueStore,
    StorageErrorKind, TaskBackend,
};

fn memory_backend() -> (Arc<MemoryKeyValueStore>, BlobStoreBackend) {
    let store = Arc::new(MemoryKeyValueStore::new());
    let backend = BlobStoreBackend::new(store.clone(), "tasks");
    (store, backend)
}

#[tokio::test]
async fn buy_milk_scenario() {
    let (_store, backend) = memory_backend();
    backend.init().await.unwrap();

    let id = backend.add_task("Buy milk", "2 liters").await.unwrap().inserted_id;
    let tasks = backend.fetch_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, id);
    assert_eq!(tasks[0].title, "Buy milk");
    assert_eq!(tasks[0].description, "2 liters");
    assert!(!tasks[0].done);

    let status = backend.update_task_status(id, true).await.unwrap();
    assert_eq!(status.rows_affected, 1);
    assert!(backend.fetch_tasks().await.unwrap()[0].done);

    backend.delete_task(id).await.unwrap();
    assert!(backend.fetch_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn rapid_inserts_get_unique_descending_ids() {
    let (_store, backend) = memory_backend();

    let mut ids = Vec::new();
    for n in 0..20 {
        ids.push(backend.add_task(&format!("task {n}"), "").await.unwrap().inserted_id);
    }

    let fetched: Vec<_> = backend
        .fetch_tasks()
        .await
        .unwrap()
        .into_iter()
        .map(|task| task.id)
        .collect();
    ids.reverse();
    assert_eq!(fetched, ids);
    assert!(fetched.windows(2).all(|pair| pair[0] > pair[1]));
}

#[tokio::test]
async fn stored_blob_keeps_all_four_fields() {
    let (store, backend) = memory_backend();
    let id = backend.add_task("it's \"quoted\"", "").await.unwrap().inserted_id;

    let blob = store.get_item("tasks").await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(value[0]["id"], id);
    assert_eq!(value[0]["title"], "it's \"quoted\"");
    assert_eq!(value[0]["description"], "");
    assert_eq!(value[0]["done"], false);
}

#[tokio::test]
async fn corrupt_blob_reads_as_empty_and_is_replaced_on_add() {
    let (store, backend) = memory_backend();
    store.set_item("tasks", "{not json").await.unwrap();

    assert!(backend.fetch_tasks().await.unwrap().is_empty());

    backend.add_task("fresh", "").await.unwrap();
    let tasks = backend.fetch_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "fresh");
}

#[tokio::test]
async fn unknown_id_mutations_leave_blob_untouched() {
    let (store, backend) = memory_backend();
    let id = backend.add_task("only", "one").await.unwrap().inserted_id;
    let before = store.get_item("tasks").await.unwrap();

    let missing = id + 1;
    assert_eq!(backend.update_task_status(missing, true).await.unwrap().rows_affected, 0);
    assert_eq!(backend.update_task(missing, "x", "y").await.unwrap().rows_affected, 0);
    assert_eq!(backend.delete_task(missing).await.unwrap().rows_affected, 0);

    assert_eq!(store.get_item("tasks").await.unwrap(), before);
}

#[tokio::test]
async fn toggle_back_restores_status_and_keeps_text() {
    let (_store, backend) = memory_backend();
    let id = backend.add_task("walk", "the dog").await.unwrap().inserted_id;

    backend.update_task_status(id, true).await.unwrap();
    backend.update_task_status(id, false).await.unwrap();

    let task = &backend.fetch_tasks().await.unwrap()[0];
    assert!(!task.done);
    assert_eq!(task.title, "walk");
    assert_eq!(task.description, "the dog");
}

#[tokio::test]
async fn update_task_changes_text_but_not_status() {
    let (_store, backend) = memory_backend();
    let id = backend.add_task("draft", "").await.unwrap().inserted_id;
    backend.update_task_status(id, true).await.unwrap();

    let result = backend.update_task(id, "final", "notes").await.unwrap();
    assert_eq!(result.rows_affected, 1);

    let task = &backend.fetch_tasks().await.unwrap()[0];
    assert_eq!(task.title, "final");
    assert_eq!(task.description, "notes");
    assert!(task.done);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_do_not_lose_writes() {
    let (_store, backend) = memory_backend();
    let backend = Arc::new(backend);

    let handles: Vec<_> = (0..16)
        .map(|n| {
            let backend = backend.clone();
            tokio::spawn(async move { backend.add_task(&format!("task {n}"), "").await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(backend.fetch_tasks().await.unwrap().len(), 16);
}

#[tokio::test]
async fn file_store_persists_across_backend_instances() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let backend = BlobStoreBackend::new(Arc::new(FileKeyValueStore::new(dir.path())), "tasks");
        backend.add_task("persisted", "").await.unwrap().inserted_id
    };

    let backend = BlobStoreBackend::new(Arc::new(FileKeyValueStore::new(dir.path())), "tasks");
    let tasks = backend.fetch_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, id);
}

struct ReadOnlyStore(MemoryKeyValueStore);

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get_item(&self, key: &str) -> KvResult<Option<String>> {
        self.0.get_item(key).await
    }

    async fn set_item(&self, key: &str, _value: &str) -> KvResult<()> {
        Err(KvError::Io {
            key: key.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

#[tokio::test]
async fn write_failure_surfaces_as_storage_io() {
    let backend = BlobStoreBackend::new(
        Arc::new(ReadOnlyStore(MemoryKeyValueStore::new())),
        "tasks",
    );

    let err = backend.add_task("lost", "").await.unwrap_err();
    assert_eq!(err.kind(), StorageErrorKind::StorageIo);
    assert!(backend.fetch_tasks().await.unwrap().is_empty());
}
