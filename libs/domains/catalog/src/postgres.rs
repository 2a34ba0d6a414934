use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, DatabaseTransaction, EntityTrait, TransactionTrait};
use std::time::Instant;

use crate::{
    entity,
    error::{CatalogError, CatalogResult},
    metrics::CatalogMetrics,
    models::Product,
    store::{ProductStore, StoreTransaction, TxScope},
};

pub struct PgProductStore {
    db: DatabaseConnection,
    metrics: CatalogMetrics,
}

impl PgProductStore {
    pub fn new(db: DatabaseConnection, metrics: CatalogMetrics) -> Self {
        Self { db, metrics }
    }
}

/// Wraps a SeaORM transaction; SeaORM rolls it back if dropped unfinished.
pub struct PgTransaction {
    inner: DatabaseTransaction,
}

#[async_trait]
impl StoreTransaction for PgTransaction {
    async fn commit(self) -> CatalogResult<()> {
        self.inner
            .commit()
            .await
            .map_err(|e| CatalogError::transaction("commit", e))
    }

    async fn rollback(self) -> CatalogResult<()> {
        self.inner
            .rollback()
            .await
            .map_err(|e| CatalogError::transaction("rollback", e))
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    type Tx = PgTransaction;

    async fn get(&self, sku: &str) -> CatalogResult<Product> {
        let started = Instant::now();
        let result = entity::Entity::find_by_id(sku.to_string())
            .one(&self.db)
            .await;
        self.metrics
            .store_operation("get", started.elapsed(), result.is_ok());

        result
            .map_err(|e| CatalogError::storage("get", sku, e))?
            .map(Product::from)
            .ok_or_else(|| CatalogError::NotFound(sku.to_string()))
    }

    async fn upsert(&self, product: &Product, scope: TxScope<'_, Self::Tx>) -> CatalogResult<()> {
        let started = Instant::now();
        let insert = entity::Entity::insert(entity::ActiveModel::from(product)).on_conflict(
            OnConflict::column(entity::Column::Sku)
                .update_columns([entity::Column::Upc, entity::Column::Name])
                .to_owned(),
        );

        let result = match scope {
            TxScope::Implicit => insert.exec_without_returning(&self.db).await,
            TxScope::Within(tx) => insert.exec_without_returning(&tx.inner).await,
        };
        self.metrics
            .store_operation("upsert", started.elapsed(), result.is_ok());

        result
            .map(|_| ())
            .map_err(|e| CatalogError::storage("upsert", &product.code, e))
    }

    async fn begin_transaction(&self) -> CatalogResult<Self::Tx> {
        let started = Instant::now();
        let result = self.db.begin().await;
        self.metrics
            .store_operation("begin", started.elapsed(), result.is_ok());

        result
            .map(|inner| PgTransaction { inner })
            .map_err(|e| CatalogError::transaction("begin", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    fn model(sku: &str, upc: &str, name: &str) -> entity::Model {
        entity::Model {
            sku: sku.to_string(),
            upc: upc.to_string(),
            name: name.to_string(),
        }
    }

    fn store(db: MockDatabase) -> PgProductStore {
        PgProductStore::new(db.into_connection(), CatalogMetrics::default())
    }

    #[tokio::test]
    async fn test_get_maps_row_to_product() {
        let store = store(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![model("sku1", "upc1", "name1")]]),
        );

        let product = store.get("sku1").await.unwrap();
        assert_eq!(product, Product::new("sku1", "upc1", "name1"));
    }

    #[tokio::test]
    async fn test_get_missing_row_is_not_found() {
        let store = store(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<entity::Model>::new()]),
        );

        let err = store.get("sku1").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(ref sku) if sku == "sku1"));
    }

    #[tokio::test]
    async fn test_get_database_error_is_storage_error() {
        let store = store(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Custom("connection reset".to_string())]),
        );

        let err = store.get("sku1").await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Storage { operation: "get", ref sku, .. } if sku == "sku1"
        ));
    }

    #[tokio::test]
    async fn test_implicit_upsert() {
        let store = store(
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]),
        );

        let result = store
            .upsert(&Product::new("sku1", "upc1", "name1"), TxScope::Implicit)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_upsert_error_is_storage_error() {
        let store = store(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_errors([DbErr::Custom("unique violation".to_string())]),
        );

        let err = store
            .upsert(&Product::new("sku1", "upc1", "name1"), TxScope::Implicit)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Storage { operation: "upsert", .. }));
    }

    #[tokio::test]
    async fn test_upsert_within_transaction_then_commit() {
        let store = store(
            MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]),
        );

        let mut tx = store.begin_transaction().await.unwrap();
        store
            .upsert(&Product::new("sku1", "upc1", "name1"), TxScope::Within(&mut tx))
            .await
            .unwrap();
        assert!(tx.commit().await.is_ok());
    }
}
