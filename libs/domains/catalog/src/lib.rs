//! Catalog Domain
//!
//! Products identified by a stock-keeping code (sku): idempotent creation,
//! lookup, and change notification.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, create-if-absent, transaction boundaries
//! └──┬───────┬──┘
//!    │       │
//! ┌──▼────┐ ┌▼─────────┐
//! │ Store │ │ Notifier │  ← Persistence (trait + impls), change events
//! └──┬────┘ └──────────┘
//!    │
//! ┌──▼──────────┐
//! │   Models    │
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{
//!     handlers, CatalogMetrics, CatalogService, InMemoryProductStore, LogNotifier,
//! };
//!
//! let store = InMemoryProductStore::new();
//! let service = CatalogService::new(store, LogNotifier, CatalogMetrics::default());
//!
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod notifier;
pub mod postgres;
pub mod service;
pub mod store;

pub use error::{CatalogError, CatalogResult, ErrorKind};
pub use handlers::ApiDoc;
pub use metrics::CatalogMetrics;
pub use models::Product;
pub use notifier::{DEFAULT_PRODUCT_SUBJECT, LogNotifier, NatsProductNotifier, ProductNotifier};
pub use postgres::{PgProductStore, PgTransaction};
pub use service::CatalogService;
pub use store::{
    Fault, InMemoryProductStore, InMemoryTransaction, ProductStore, StoreOp, StoreTransaction,
    TxScope,
};
