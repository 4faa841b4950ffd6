use std::sync::Arc;
use tasknote_core::{
    BlobStoreBackend, DbLocation, KeyValueStore, MemoryKeyValueStore, RelationalBackend,
    StorageErrorKind, TaskBackend,
};

fn backend_at(location: DbLocation) -> (Arc<MemoryKeyValueStore>, RelationalBackend) {
    let store = Arc::new(MemoryKeyValueStore::new());
    let fallback = BlobStoreBackend::new(store.clone(), "tasks");
    (store, RelationalBackend::new(location, fallback))
}

async fn ready_backend() -> RelationalBackend {
    let (_store, backend) = backend_at(DbLocation::Memory);
    backend.init().await.unwrap();
    backend
}

#[tokio::test]
async fn calls_before_init_fail_with_not_initialized() {
    let (_store, backend) = backend_at(DbLocation::Memory);

    let add = backend.add_task("early", "").await.unwrap_err();
    assert_eq!(add.kind(), StorageErrorKind::NotInitialized);
    let fetch = backend.fetch_tasks().await.unwrap_err();
    assert_eq!(fetch.kind(), StorageErrorKind::NotInitialized);
    let delete = backend.delete_task(1).await.unwrap_err();
    assert_eq!(delete.kind(), StorageErrorKind::NotInitialized);
}

#[tokio::test]
async fn buy_milk_scenario() {
    let backend = ready_backend().await;

    let id = backend.add_task("Buy milk", "2 liters").await.unwrap().inserted_id;
    let tasks = backend.fetch_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, id);
    assert_eq!(tasks[0].title, "Buy milk");
    assert_eq!(tasks[0].description, "2 liters");
    assert!(!tasks[0].done);

    backend.update_task_status(id, true).await.unwrap();
    assert!(backend.fetch_tasks().await.unwrap()[0].done);

    let deleted = backend.delete_task(id).await.unwrap();
    assert_eq!(deleted.rows_affected, 1);
    assert!(backend.fetch_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn fetch_orders_newest_first() {
    let backend = ready_backend().await;
    let first = backend.add_task("first", "").await.unwrap().inserted_id;
    let second = backend.add_task("second", "").await.unwrap().inserted_id;
    let third = backend.add_task("third", "").await.unwrap().inserted_id;

    let ids: Vec<_> = backend
        .fetch_tasks()
        .await
        .unwrap()
        .into_iter()
        .map(|task| task.id)
        .collect();
    assert_eq!(ids, vec![third, second, first]);
}

#[tokio::test]
async fn quotes_and_sql_fragments_are_stored_verbatim() {
    let backend = ready_backend().await;
    let title = "Robert'); DROP TABLE tasks;--";
    let description = "it's a \"test\"";

    let id = backend.add_task(title, description).await.unwrap().inserted_id;
    backend.update_task(id, title, description).await.unwrap();

    let tasks = backend.fetch_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, title);
    assert_eq!(tasks[0].description, description);
}

#[tokio::test]
async fn unknown_id_mutations_are_no_ops() {
    let backend = ready_backend().await;
    let id = backend.add_task("keep", "me").await.unwrap().inserted_id;

    assert_eq!(backend.update_task_status(id + 100, true).await.unwrap().rows_affected, 0);
    assert_eq!(backend.update_task(id + 100, "x", "y").await.unwrap().rows_affected, 0);
    assert_eq!(backend.delete_task(id + 100).await.unwrap().rows_affected, 0);

    let tasks = backend.fetch_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "keep");
    assert!(!tasks[0].done);
}

#[tokio::test]
async fn toggle_back_keeps_text() {
    let backend = ready_backend().await;
    let id = backend.add_task("walk", "the dog").await.unwrap().inserted_id;

    backend.update_task_status(id, true).await.unwrap();
    backend.update_task_status(id, false).await.unwrap();

    let task = &backend.fetch_tasks().await.unwrap()[0];
    assert!(!task.done);
    assert_eq!(task.title, "walk");
    assert_eq!(task.description, "the dog");
}

#[tokio::test]
async fn file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let location = DbLocation::File(dir.path().join("tasks.db"));

    let (_store, backend) = backend_at(location.clone());
    backend.init().await.unwrap();
    let id = backend.add_task("durable", "").await.unwrap().inserted_id;
    drop(backend);

    let (_store, reopened) = backend_at(location);
    reopened.init().await.unwrap();
    assert!(!reopened.is_degraded().await);
    assert_eq!(reopened.fetch_tasks().await.unwrap()[0].id, id);
}

#[tokio::test]
async fn open_failure_degrades_to_blob_store() {
    let dir = tempfile::tempdir().unwrap();
    let location = DbLocation::File(dir.path().join("missing").join("tasks.db"));
    let (store, backend) = backend_at(location);

    backend.init().await.unwrap();
    assert!(backend.is_degraded().await);

    let id = backend.add_task("offline", "fallback").await.unwrap().inserted_id;
    let tasks = backend.fetch_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, id);
    assert_eq!(tasks[0].title, "offline");
    assert!(store.get_item("tasks").await.unwrap().is_some());

    backend.update_task_status(id, true).await.unwrap();
    assert!(backend.fetch_tasks().await.unwrap()[0].done);
}

#[tokio::test]
async fn table_creation_failure_degrades_to_blob_store() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tasks.db");
    std::fs::write(&db_path, "not a database\n".repeat(200)).unwrap();
    let (store, backend) = backend_at(DbLocation::File(db_path));

    backend.init().await.unwrap();
    assert!(backend.is_degraded().await);

    let id = backend.add_task("schema", "failed").await.unwrap().inserted_id;
    let tasks = backend.fetch_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, id);
    assert_eq!(tasks[0].description, "failed");
    assert!(store.get_item("tasks").await.unwrap().is_some());
}

#[tokio::test]
async fn degraded_mode_is_permanent() {
    let dir = tempfile::tempdir().unwrap();
    let missing_dir = dir.path().join("missing");
    let (_store, backend) = backend_at(DbLocation::File(missing_dir.join("tasks.db")));

    backend.init().await.unwrap();
    std::fs::create_dir_all(&missing_dir).unwrap();
    backend.init().await.unwrap();

    assert!(backend.is_degraded().await);
    assert!(!missing_dir.join("tasks.db").exists());
}

#[tokio::test]
async fn repeated_init_keeps_existing_connection() {
    let backend = ready_backend().await;
    backend.add_task("still here", "").await.unwrap();

    backend.init().await.unwrap();
    assert_eq!(backend.fetch_tasks().await.unwrap().len(), 1);
}
