//! Prometheus metrics for the catalog.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Metrics context shared by the catalog service and its stores.
///
/// Recording is a no-op until a recorder is installed, so tests can build
/// one freely.
#[derive(Clone, Debug)]
pub struct CatalogMetrics {
    service: String,
}

impl CatalogMetrics {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    /// Register metric descriptions with the installed recorder.
    pub fn describe() {
        describe_counter!(
            "catalog_store_operations_total",
            "Store operations by operation and outcome"
        );
        describe_histogram!(
            "catalog_store_operation_duration_seconds",
            "Store operation duration in seconds"
        );
        describe_counter!(
            "catalog_products_created_total",
            "Products written by create requests"
        );
        describe_counter!(
            "catalog_products_existing_total",
            "Create requests skipped because the sku already existed"
        );
        describe_counter!(
            "catalog_rollback_failures_total",
            "Transaction rollbacks that failed"
        );
        describe_counter!(
            "catalog_notifications_total",
            "Product change notifications by outcome"
        );
    }

    pub fn store_operation(&self, operation: &'static str, duration: Duration, success: bool) {
        let outcome = if success { "success" } else { "error" };

        counter!(
            "catalog_store_operations_total",
            "service" => self.service.clone(),
            "operation" => operation,
            "outcome" => outcome
        )
        .increment(1);

        histogram!(
            "catalog_store_operation_duration_seconds",
            "service" => self.service.clone(),
            "operation" => operation
        )
        .record(duration.as_secs_f64());
    }

    pub fn product_created(&self) {
        counter!("catalog_products_created_total", "service" => self.service.clone()).increment(1);
    }

    pub fn product_existing(&self) {
        counter!("catalog_products_existing_total", "service" => self.service.clone())
            .increment(1);
    }

    pub fn rollback_failed(&self) {
        counter!("catalog_rollback_failures_total", "service" => self.service.clone())
            .increment(1);
    }

    pub fn notification(&self, success: bool) {
        let outcome = if success { "success" } else { "error" };
        counter!(
            "catalog_notifications_total",
            "service" => self.service.clone(),
            "outcome" => outcome
        )
        .increment(1);
    }
}

impl Default for CatalogMetrics {
    fn default() -> Self {
        Self::new("catalog")
    }
}
