#![allow(clippy::needless_return)]
mod store;

use fanout_store::MemoryStore;

#[tokio_shared_rt::test]
async fn insert() {
    let store = MemoryStore::new();
    store::test_insert(&store).await.unwrap();
}

#[tokio_shared_rt::test]
async fn unique_name() {
    let store = MemoryStore::new();
    store::test_unique_name(&store).await.unwrap();
}

#[tokio_shared_rt::test]
async fn find() {
    let store = MemoryStore::new();
    store::test_find(&store).await.unwrap();
}

#[tokio_shared_rt::test]
async fn update_delete() {
    let store = MemoryStore::new();
    store::test_update_delete(&store).await.unwrap();
}

#[tokio_shared_rt::test]
async fn concurrency() {
    let store = MemoryStore::new();
    store::test_concurrency(&store).await.unwrap();
}
