use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};
use crate::models::Product;

/// Default subject product change events are published to.
pub const DEFAULT_PRODUCT_SUBJECT: &str = "product.exchange";

/// Best-effort publisher of product change events.
///
/// Success means the broker accepted the message, nothing more.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductNotifier: Send + Sync {
    async fn publish(&self, product: &Product) -> CatalogResult<()>;
}

#[async_trait]
impl<T: ProductNotifier + ?Sized> ProductNotifier for Arc<T> {
    async fn publish(&self, product: &Product) -> CatalogResult<()> {
        (**self).publish(product).await
    }
}

/// Publishes products as JSON to a NATS subject.
#[derive(Clone)]
pub struct NatsProductNotifier {
    client: async_nats::Client,
    subject: String,
}

impl NatsProductNotifier {
    pub fn new(client: async_nats::Client, subject: impl Into<String>) -> Self {
        Self {
            client,
            subject: subject.into(),
        }
    }

    /// Connect to the broker at `url`.
    pub async fn connect(url: &str, subject: impl Into<String>) -> CatalogResult<Self> {
        let client = async_nats::connect(url)
            .await
            .map_err(|e| CatalogError::Internal(format!("NATS connection error: {}", e)))?;

        info!(url = %url, "Connected to NATS");
        Ok(Self::new(client, subject))
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

#[async_trait]
impl ProductNotifier for NatsProductNotifier {
    async fn publish(&self, product: &Product) -> CatalogResult<()> {
        let payload = serde_json::to_vec(product)
            .map_err(|e| CatalogError::notification(&product.code, e))?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await
            .map_err(|e| CatalogError::notification(&product.code, e))?;
        self.client
            .flush()
            .await
            .map_err(|e| CatalogError::notification(&product.code, e))?;

        debug!(subject = %self.subject, sku = %product.code, "Published product");
        Ok(())
    }
}

/// Stand-in used when no broker is configured; logs instead of publishing.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl ProductNotifier for LogNotifier {
    async fn publish(&self, product: &Product) -> CatalogResult<()> {
        info!(sku = %product.code, "Queue mocked, product change not published");
        Ok(())
    }
}
