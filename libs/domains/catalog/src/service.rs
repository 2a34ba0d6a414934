use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::metrics::CatalogMetrics;
use crate::models::Product;
use crate::notifier::ProductNotifier;
use crate::store::{ProductStore, StoreTransaction, TxScope};

/// Service layer for catalog business logic.
///
/// Creation is check-then-act: two concurrent creates for the same sku can
/// both pass the existence check, and the last one to commit wins. Neither
/// caller is told.
pub struct CatalogService<S: ProductStore, N: ProductNotifier> {
    store: Arc<S>,
    notifier: Arc<N>,
    metrics: CatalogMetrics,
}

impl<S: ProductStore, N: ProductNotifier> Clone for CatalogService<S, N> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            notifier: Arc::clone(&self.notifier),
            metrics: self.metrics.clone(),
        }
    }
}

impl<S: ProductStore, N: ProductNotifier> CatalogService<S, N> {
    pub fn new(store: S, notifier: N, metrics: CatalogMetrics) -> Self {
        Self {
            store: Arc::new(store),
            notifier: Arc::new(notifier),
            metrics,
        }
    }

    /// Create a product unless one with the same sku already exists.
    ///
    /// An existing product is left untouched and the call still succeeds.
    /// A change event is published once the write commits; publish failures
    /// are logged and never undo the commit.
    #[instrument(skip(self, product), fields(sku = %product.code))]
    pub async fn create_product(&self, product: Product) -> CatalogResult<Product> {
        product
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        match self.store.get(&product.code).await {
            Ok(_) => {
                debug!("Product already exists");
                self.metrics.product_existing();
                return Ok(product);
            }
            Err(CatalogError::NotFound(_)) => {}
            Err(e) => {
                error!(error = %e, "Failed to check for existing product");
                return Err(e);
            }
        }

        info!(upc = %product.universal_id, name = %product.name, "Creating product");

        let mut tx = self
            .store
            .begin_transaction()
            .await
            .map_err(|e| e.with_sku(&product.code))
            .inspect_err(|e| {
                error!(error = %e, "Failed to begin transaction");
            })?;

        if let Err(e) = self.store.upsert(&product, TxScope::Within(&mut tx)).await {
            error!(error = %e, "Failed to save product");
            self.rollback(tx).await;
            return Err(e);
        }

        tx.commit()
            .await
            .map_err(|e| e.with_sku(&product.code))
            .inspect_err(|e| {
                error!(error = %e, "Failed to commit product");
            })?;
        self.metrics.product_created();

        self.notify(&product).await;
        Ok(product)
    }

    /// Get a product by sku.
    #[instrument(skip(self))]
    pub async fn get_product(&self, sku: &str) -> CatalogResult<Product> {
        if sku.is_empty() {
            return Err(CatalogError::Validation("sku is required".to_string()));
        }

        self.store.get(sku).await.inspect_err(|e| {
            if !e.is_not_found() {
                error!(error = %e, "Failed to get product");
            }
        })
    }

    async fn rollback(&self, tx: S::Tx) {
        if let Err(e) = tx.rollback().await {
            warn!(error = %e, "Failed to rollback transaction");
            self.metrics.rollback_failed();
        }
    }

    async fn notify(&self, product: &Product) {
        match self.notifier.publish(product).await {
            Ok(()) => self.metrics.notification(true),
            Err(e) => {
                warn!(error = %e, "Failed to publish product change");
                self.metrics.notification(false);
            }
        }
    }
}
