use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, env_bool, env_or_default, server::ServerConfig,
};
use database::postgres::PostgresConfig;
use domain_catalog::DEFAULT_PRODUCT_SUBJECT;

pub use core_config::Environment;

pub const DEFAULT_NATS_URL: &str = "nats://localhost:4222";

/// Message broker settings for product change events.
#[derive(Clone, Debug)]
pub struct QueueConfig {
    /// Log events instead of publishing them (QUEUE_MOCK)
    pub mock: bool,
    pub url: String,
    pub product_subject: String,
}

impl FromEnv for QueueConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            mock: env_bool("QUEUE_MOCK", false)?,
            url: env_or_default("NATS_URL", DEFAULT_NATS_URL),
            product_subject: env_or_default("QUEUE_PRODUCT_SUBJECT", DEFAULT_PRODUCT_SUBJECT),
        })
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    /// Deployment revision reported in the startup banner (APP_REVISION)
    pub revision: String,
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: PostgresConfig,
    /// Apply pending migrations at startup (DB_MIGRATE)
    pub migrate: bool,
    /// Drop all tables and migrate from scratch at startup (DB_CLEAN)
    pub clean: bool,
    pub queue: QueueConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            revision: env_or_default("APP_REVISION", "1"),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            database: PostgresConfig::from_env()?, // Required - will fail if not set
            migrate: env_bool("DB_MIGRATE", true)?,
            clean: env_bool("DB_CLEAN", false)?,
            queue: QueueConfig::from_env()?,
        })
    }
}
