//! Product routes wired to PostgreSQL and the configured notifier.

use crate::state::AppState;
use axum::Router;
use domain_catalog::{CatalogMetrics, CatalogService, PgProductStore, handlers};

pub fn router(state: &AppState) -> Router {
    let metrics = CatalogMetrics::new(state.config.app.name);
    let store = PgProductStore::new(state.db.clone(), metrics.clone());
    let service = CatalogService::new(store, state.notifier.clone(), metrics);

    handlers::router(service)
}
