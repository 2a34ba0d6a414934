use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install color-eyre with a project-standard configuration.
///
/// Call this early in main() before any fallible operations. Safe to call
/// multiple times.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// `LOG_FORMAT=json|text` wins; otherwise JSON in production, pretty elsewhere.
    pub fn resolve(environment: &Environment) -> Self {
        match std::env::var("LOG_FORMAT").map(|v| v.to_ascii_lowercase()) {
            Ok(v) if v == "json" => LogFormat::Json,
            Ok(v) if v == "text" || v == "pretty" => LogFormat::Pretty,
            _ if environment.is_production() => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Build the level filter: `RUST_LOG`, then `LOG_LEVEL`, then a per-environment default.
fn build_filter(environment: &Environment) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    if let Ok(level) = std::env::var("LOG_LEVEL") {
        if let Ok(filter) = EnvFilter::try_new(level.trim()) {
            if !level.trim().is_empty() {
                return filter;
            }
        }
    }

    if environment.is_production() {
        EnvFilter::new("info,sea_orm=warn,sqlx=warn")
    } else {
        EnvFilter::new("debug,tower_http=debug,sea_orm=info")
    }
}

/// Initialize tracing with environment-aware configuration and error span capture.
///
/// - **Production** (`APP_ENV=production`): JSON lines, no module targets
/// - **Development** (default): pretty-printed
///
/// Both include `tracing_error::ErrorLayer` so eyre reports carry span traces.
///
/// Environment variables:
/// - `APP_ENV`: "production" for JSON logs (default: "development")
/// - `RUST_LOG` / `LOG_LEVEL`: level directives (e.g. "debug", "domain_catalog=trace")
/// - `LOG_FORMAT`: "json" or "text" to override the environment default
///
/// Safe to call multiple times; later calls are no-ops.
pub fn init_tracing(environment: &Environment) {
    let filter = build_filter(environment);

    let result = match LogFormat::resolve(environment) {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
    };

    match result {
        Ok(_) => {
            info!(
                "Tracing initialized with ErrorLayer. Environment: {:?}",
                environment
            );
        }
        Err(_) => {
            debug!("Tracing already initialized, skipping re-initialization");
        }
    }
}
