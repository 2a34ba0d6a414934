//! Shared application state handed to routers at startup.

use domain_catalog::ProductNotifier;
use std::sync::Arc;

/// Cloned into each router; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
    /// NATS publisher, or a logging stand-in when QUEUE_MOCK is set
    pub notifier: Arc<dyn ProductNotifier>,
}
