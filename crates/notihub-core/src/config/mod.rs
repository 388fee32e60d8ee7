//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod logging;
pub mod query;
pub mod store;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::{AppCredential, AuthConfig};
pub use self::logging::LoggingConfig;
pub use self::query::QueryConfig;
pub use self::store::{DatabaseConfig, StoreBackend, StoreConfig};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Record store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Query pipeline defaults.
    #[serde(default)]
    pub query: QueryConfig,
    /// Caller authorization settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `NOTIHUB__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Same as [`AppConfig::load`] but reading TOML files from `dir`.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("NOTIHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the rest of the application cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.query.default_per_page == 0 {
            return Err(AppError::configuration(
                "query.default_per_page must be at least 1",
            ));
        }
        if self.query.searchable_fields.is_empty() {
            return Err(AppError::configuration(
                "query.searchable_fields must name at least one field",
            ));
        }
        match self.store.backend {
            StoreBackend::File if self.store.data_dir.trim().is_empty() => Err(
                AppError::configuration("store.data_dir is required for the file backend"),
            ),
            StoreBackend::Postgres if self.store.database.url.trim().is_empty() => Err(
                AppError::configuration("store.database.url is required for the postgres backend"),
            ),
            _ => Ok(()),
        }
    }
}
