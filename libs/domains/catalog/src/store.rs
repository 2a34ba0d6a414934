use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

use crate::error::{CatalogError, CatalogResult};
use crate::models::Product;

/// A unit of work opened by a [`ProductStore`].
///
/// `commit` and `rollback` consume the handle, so each transaction reaches
/// exactly one terminal call. Dropping a handle without either rolls it back.
#[async_trait]
pub trait StoreTransaction: Send + Sized + 'static {
    /// Make the transaction's writes visible.
    ///
    /// On failure none of the writes may become visible: implementations
    /// roll back (or discard staged work) before returning the error, since
    /// the caller no longer holds a handle to roll back with.
    async fn commit(self) -> CatalogResult<()>;

    async fn rollback(self) -> CatalogResult<()>;
}

/// Where a write runs: on its own, or inside a caller-owned transaction.
pub enum TxScope<'a, T> {
    Implicit,
    Within(&'a mut T),
}

/// Transactional persistence for products, keyed by sku.
#[async_trait]
pub trait ProductStore: Send + Sync + 'static {
    type Tx: StoreTransaction;

    /// Latest committed product for `sku`, or `CatalogError::NotFound`.
    async fn get(&self, sku: &str) -> CatalogResult<Product>;

    /// Insert the product, or overwrite upc and name if the sku exists.
    async fn upsert(&self, product: &Product, scope: TxScope<'_, Self::Tx>) -> CatalogResult<()>;

    async fn begin_transaction(&self) -> CatalogResult<Self::Tx>;
}

/// Store operations that can be counted or made to misbehave in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Get,
    Upsert,
    Begin,
    Commit,
    Rollback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Return an infrastructure error
    Fail,
    /// Never complete
    Stall,
}

#[derive(Debug, Default)]
struct StoreState {
    calls: Mutex<HashMap<StoreOp, usize>>,
    faults: Mutex<HashMap<StoreOp, Fault>>,
    open_transactions: AtomicUsize,
}

/// In-memory implementation of ProductStore (for development/testing)
///
/// Transactions stage their writes and apply them under the write lock on
/// commit, so readers never observe uncommitted products.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<HashMap<String, Product>>>,
    state: Arc<StoreState>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call of `op` misbehave.
    pub fn inject_fault(&self, op: StoreOp, fault: Fault) {
        if let Ok(mut faults) = self.state.faults.lock() {
            faults.insert(op, fault);
        }
    }

    pub fn clear_faults(&self) {
        if let Ok(mut faults) = self.state.faults.lock() {
            faults.clear();
        }
    }

    /// Number of times `op` was invoked.
    pub fn calls(&self, op: StoreOp) -> usize {
        self.state
            .calls
            .lock()
            .map(|calls| calls.get(&op).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Total invocations across all operations.
    pub fn total_calls(&self) -> usize {
        self.state
            .calls
            .lock()
            .map(|calls| calls.values().sum())
            .unwrap_or(0)
    }

    /// Transactions begun but not yet committed, rolled back or dropped.
    pub fn open_transactions(&self) -> usize {
        self.state.open_transactions.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }

    async fn enter(&self, op: StoreOp) -> Option<Fault> {
        if let Ok(mut calls) = self.state.calls.lock() {
            *calls.entry(op).or_insert(0) += 1;
        }

        let fault = self
            .state
            .faults
            .lock()
            .ok()
            .and_then(|faults| faults.get(&op).copied());

        if fault == Some(Fault::Stall) {
            std::future::pending::<()>().await;
        }
        fault
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    type Tx = InMemoryTransaction;

    async fn get(&self, sku: &str) -> CatalogResult<Product> {
        if self.enter(StoreOp::Get).await.is_some() {
            return Err(CatalogError::storage("get", sku, "injected failure"));
        }

        let products = self.products.read().await;
        products
            .get(sku)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(sku.to_string()))
    }

    async fn upsert(&self, product: &Product, scope: TxScope<'_, Self::Tx>) -> CatalogResult<()> {
        if self.enter(StoreOp::Upsert).await.is_some() {
            return Err(CatalogError::storage("upsert", &product.code, "injected failure"));
        }

        match scope {
            TxScope::Within(tx) => tx.staged.push(product.clone()),
            TxScope::Implicit => {
                let mut products = self.products.write().await;
                products.insert(product.code.clone(), product.clone());
            }
        }
        Ok(())
    }

    async fn begin_transaction(&self) -> CatalogResult<Self::Tx> {
        if self.enter(StoreOp::Begin).await.is_some() {
            return Err(CatalogError::transaction("begin", "injected failure"));
        }

        self.state.open_transactions.fetch_add(1, Ordering::SeqCst);
        Ok(InMemoryTransaction {
            store: self.clone(),
            staged: Vec::new(),
        })
    }
}

/// Transaction handle for [`InMemoryProductStore`].
#[derive(Debug)]
pub struct InMemoryTransaction {
    store: InMemoryProductStore,
    staged: Vec<Product>,
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn commit(mut self) -> CatalogResult<()> {
        if self.store.enter(StoreOp::Commit).await.is_some() {
            self.staged.clear();
            return Err(CatalogError::transaction("commit", "injected failure"));
        }

        let staged = std::mem::take(&mut self.staged);
        let mut products = self.store.products.write().await;
        for product in staged {
            products.insert(product.code.clone(), product);
        }
        Ok(())
    }

    async fn rollback(mut self) -> CatalogResult<()> {
        self.staged.clear();
        if self.store.enter(StoreOp::Rollback).await.is_some() {
            return Err(CatalogError::transaction("rollback", "injected failure"));
        }
        Ok(())
    }
}

impl Drop for InMemoryTransaction {
    fn drop(&mut self) {
        if !self.staged.is_empty() {
            tracing::debug!(
                staged = self.staged.len(),
                "Transaction dropped without commit, discarding staged writes"
            );
        }
        self.store
            .state
            .open_transactions
            .fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let store = InMemoryProductStore::new();

        let result = store.get("sku1").await;
        assert!(matches!(result, Err(CatalogError::NotFound(sku)) if sku == "sku1"));
    }

    #[tokio::test]
    async fn test_implicit_upsert_inserts_then_overwrites() {
        let store = InMemoryProductStore::new();

        store
            .upsert(&Product::new("sku1", "upc1", "name1"), TxScope::Implicit)
            .await
            .unwrap();
        store
            .upsert(&Product::new("sku1", "upc2", "name2"), TxScope::Implicit)
            .await
            .unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(
            store.get("sku1").await.unwrap(),
            Product::new("sku1", "upc2", "name2")
        );
    }

    #[tokio::test]
    async fn test_transactional_write_invisible_until_commit() {
        let store = InMemoryProductStore::new();
        let product = Product::new("sku1", "upc1", "name1");

        let mut tx = store.begin_transaction().await.unwrap();
        store
            .upsert(&product, TxScope::Within(&mut tx))
            .await
            .unwrap();
        assert!(store.get("sku1").await.unwrap_err().is_not_found());

        tx.commit().await.unwrap();
        assert_eq!(store.get("sku1").await.unwrap(), product);
        assert_eq!(store.open_transactions(), 0);
    }

    #[tokio::test]
    async fn test_rollback_discards_staged_writes() {
        let store = InMemoryProductStore::new();

        let mut tx = store.begin_transaction().await.unwrap();
        store
            .upsert(&Product::new("sku1", "upc1", "name1"), TxScope::Within(&mut tx))
            .await
            .unwrap();
        tx.rollback().await.unwrap();

        assert!(store.is_empty().await);
        assert_eq!(store.open_transactions(), 0);
    }

    #[tokio::test]
    async fn test_dropped_transaction_rolls_back() {
        let store = InMemoryProductStore::new();

        {
            let mut tx = store.begin_transaction().await.unwrap();
            store
                .upsert(&Product::new("sku1", "upc1", "name1"), TxScope::Within(&mut tx))
                .await
                .unwrap();
            assert_eq!(store.open_transactions(), 1);
        }

        assert!(store.is_empty().await);
        assert_eq!(store.open_transactions(), 0);
    }

    #[tokio::test]
    async fn test_failed_commit_discards_writes() {
        let store = InMemoryProductStore::new();
        store.inject_fault(StoreOp::Commit, Fault::Fail);

        let mut tx = store.begin_transaction().await.unwrap();
        store
            .upsert(&Product::new("sku1", "upc1", "name1"), TxScope::Within(&mut tx))
            .await
            .unwrap();
        let result = tx.commit().await;

        assert!(matches!(
            result,
            Err(CatalogError::Transaction { operation: "commit", .. })
        ));
        assert!(store.is_empty().await);
        assert_eq!(store.open_transactions(), 0);
    }

    #[tokio::test]
    async fn test_injected_get_failure_is_infrastructure_error() {
        let store = InMemoryProductStore::new();
        store.inject_fault(StoreOp::Get, Fault::Fail);

        let err = store.get("sku1").await.unwrap_err();
        assert!(!err.is_not_found());

        store.clear_faults();
        assert!(store.get("sku1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_call_counters() {
        let store = InMemoryProductStore::new();

        let _ = store.get("a").await;
        let _ = store.get("b").await;
        store
            .upsert(&Product::new("a", "u", "n"), TxScope::Implicit)
            .await
            .unwrap();

        assert_eq!(store.calls(StoreOp::Get), 2);
        assert_eq!(store.calls(StoreOp::Upsert), 1);
        assert_eq!(store.calls(StoreOp::Begin), 0);
        assert_eq!(store.total_calls(), 3);
    }
}
