use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const DEFAULT_DATABASE_NAME: &str = "product_db";

#[derive(Debug, Clone, Deserialize)]
pub struct ProductConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub store: StoreConfig,
    pub otlp_endpoint: Option<String>,
}

/// Document store settings. Both values are optional: without a connection
/// string the service runs with an unavailable store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    pub uri: Option<String>,
    pub database: Option<String>,
}

impl StoreConfig {
    pub fn is_uri_set(&self) -> bool {
        self.uri.is_some()
    }

    pub fn is_database_set(&self) -> bool {
        self.database.is_some()
    }

    pub fn database_name(&self) -> &str {
        self.database.as_deref().unwrap_or(DEFAULT_DATABASE_NAME)
    }
}

impl ProductConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env, APP__ prefix and PORT)
        let common_config = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let uri = optional_env("DATABASE_URL");
        if is_prod && uri.is_none() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "DATABASE_URL is required in production but not set"
            )));
        }

        Ok(ProductConfig {
            common: common_config,
            store: StoreConfig {
                uri,
                database: optional_env("DATABASE_NAME"),
            },
            otlp_endpoint: optional_env("OTLP_ENDPOINT"),
        })
    }
}

/// Blank values count as unset.
fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
