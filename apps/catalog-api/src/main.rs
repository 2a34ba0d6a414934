use axum::{middleware, routing::get};
use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{self, MigratorTrait};
use domain_catalog::{CatalogMetrics, LogNotifier, NatsProductNotifier, ProductNotifier};
use migration::Migrator;
use observability::{init_metrics, metrics_handler, metrics_middleware};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!(
        name = config.app.name,
        version = config.app.version,
        revision = %config.revision,
        environment = config.environment.as_str(),
        "Starting catalog service"
    );

    init_metrics()?;
    CatalogMetrics::describe();

    let db = postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    prepare_schema(&config, &db).await?;

    let notifier: Arc<dyn ProductNotifier> = if config.queue.mock {
        info!("QUEUE_MOCK set, product events will only be logged");
        Arc::new(LogNotifier)
    } else {
        info!(url = %config.queue.url, subject = %config.queue.product_subject, "Connecting to NATS");
        Arc::new(
            NatsProductNotifier::connect(&config.queue.url, config.queue.product_subject.clone())
                .await?,
        )
    };

    let state = AppState {
        config,
        db,
        notifier,
    };

    let api_routes = api::routes(&state);
    let router =
        create_router::<openapi::ApiDoc>(api_routes, state.config.server.request_timeout()).await?;

    // - /health: liveness with app name/version
    // - /ready: database check
    // - /metrics: Prometheus scrape endpoint
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()))
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn(metrics_middleware));

    let AppState { config, db, .. } = state;

    create_production_app(app, &config.server, SHUTDOWN_TIMEOUT, async move {
        info!("Shutting down: closing database connections");
        match db.close().await {
            Ok(_) => info!("PostgreSQL connection closed successfully"),
            Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog service shutdown complete");
    Ok(())
}

/// DB_CLEAN rebuilds the schema from scratch; otherwise DB_MIGRATE applies pending migrations.
async fn prepare_schema(config: &Config, db: &postgres::DatabaseConnection) -> eyre::Result<()> {
    if config.clean {
        postgres::refresh_schema::<Migrator>(db, config.app.name).await?;
    } else if config.migrate {
        postgres::run_migrations::<Migrator>(db, config.app.name).await?;
    } else {
        let pending = Migrator::get_pending_migrations(db).await?;
        if !pending.is_empty() {
            tracing::warn!(
                pending = pending.len(),
                "DB_MIGRATE disabled with migrations pending"
            );
        }
    }
    Ok(())
}
