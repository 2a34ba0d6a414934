//! Observability utilities shared by our HTTP services.
//!
//! This crate provides:
//! - Prometheus recorder installation and the `/metrics` handler
//! - Axum middleware for automatic request metrics
//!
//! Domain crates record their own metrics through the `metrics` macros;
//! once [`init_metrics`] has run they show up on `/metrics` as well.
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, metrics_middleware};
//!
//! init_metrics()?;
//!
//! let app = Router::new()
//!     .route("/metrics", get(metrics_handler))
//!     .layer(axum::middleware::from_fn(metrics_middleware));
//! ```

pub mod middleware;

pub use middleware::metrics_middleware;

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};

pub use metrics_exporter_prometheus::BuildError;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder as the global `metrics` recorder.
///
/// Call once at startup; later calls return the same handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;

        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();

        Ok(handle)
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_metrics_is_idempotent_and_renders() {
        let first = init_metrics().unwrap() as *const PrometheusHandle;
        let second = init_metrics().unwrap() as *const PrometheusHandle;
        assert_eq!(first, second);

        counter!("observability_test_total").increment(1);
        let rendered = metrics_handler().await;
        assert!(rendered.contains("observability_test_total"));
    }
}
