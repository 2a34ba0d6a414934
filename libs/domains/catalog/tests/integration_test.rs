//! Integration tests for the catalog domain
//!
//! These use real PostgreSQL via testcontainers to check:
//! - Upserts insert and overwrite by sku
//! - Transactions commit, roll back, and roll back on drop
//! - The create workflow end to end
//!
//! Docker is required, so they are ignored by default:
//! `cargo test -p domain_catalog -- --ignored`

use domain_catalog::*;
use test_utils::{TestDataBuilder, TestDatabase};

fn store(db: &TestDatabase) -> PgProductStore {
    PgProductStore::new(db.connection(), CatalogMetrics::default())
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_upsert_and_get() {
    let db = TestDatabase::new().await;
    let store = store(&db);
    let builder = TestDataBuilder::from_test_name("upsert_and_get");
    let sku = builder.sku("main");

    store
        .upsert(&Product::new(&sku, "upc1", "name1"), TxScope::Implicit)
        .await
        .unwrap();
    assert_eq!(
        store.get(&sku).await.unwrap(),
        Product::new(&sku, "upc1", "name1")
    );

    store
        .upsert(&Product::new(&sku, "upc2", "name2"), TxScope::Implicit)
        .await
        .unwrap();
    assert_eq!(
        store.get(&sku).await.unwrap(),
        Product::new(&sku, "upc2", "name2")
    );
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_get_missing_is_not_found() {
    let db = TestDatabase::new().await;
    let store = store(&db);

    let err = store.get("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_rollback_discards_write() {
    let db = TestDatabase::new().await;
    let store = store(&db);
    let sku = TestDataBuilder::from_test_name("rollback").sku("main");

    let mut tx = store.begin_transaction().await.unwrap();
    store
        .upsert(&Product::new(&sku, "upc1", "name1"), TxScope::Within(&mut tx))
        .await
        .unwrap();
    tx.rollback().await.unwrap();

    assert!(store.get(&sku).await.unwrap_err().is_not_found());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_dropped_transaction_discards_write() {
    let db = TestDatabase::new().await;
    let store = store(&db);
    let sku = TestDataBuilder::from_test_name("dropped_tx").sku("main");

    {
        let mut tx = store.begin_transaction().await.unwrap();
        store
            .upsert(&Product::new(&sku, "upc1", "name1"), TxScope::Within(&mut tx))
            .await
            .unwrap();
    }

    assert!(store.get(&sku).await.unwrap_err().is_not_found());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_create_workflow_is_idempotent() {
    let db = TestDatabase::new().await;
    let service = CatalogService::new(store(&db), LogNotifier, CatalogMetrics::default());
    let sku = TestDataBuilder::from_test_name("create_workflow").sku("main");

    service
        .create_product(Product::new(&sku, "upc1", "name1"))
        .await
        .unwrap();
    service
        .create_product(Product::new(&sku, "upc2", "name2"))
        .await
        .unwrap();

    let product = service.get_product(&sku).await.unwrap();
    assert_eq!(product, Product::new(&sku, "upc1", "name1"));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_concurrent_creates_for_different_skus() {
    let db = TestDatabase::new().await;
    let service = CatalogService::new(store(&db), LogNotifier, CatalogMetrics::default());
    let builder = TestDataBuilder::from_test_name("concurrent_creates");

    let skus: Vec<String> = (0..8).map(|i| builder.sku(&i.to_string())).collect();
    let creates = skus.iter().map(|sku| {
        let service = service.clone();
        let product = Product::new(sku, "upc", "name");
        tokio::spawn(async move { service.create_product(product).await })
    });

    for handle in creates.collect::<Vec<_>>() {
        handle.await.unwrap().unwrap();
    }

    for sku in &skus {
        assert!(service.get_product(sku).await.is_ok());
    }
}
