//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field has a default so an empty file is a valid config.

pub mod app;
pub mod cache;
pub mod catalog;
pub mod logging;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::cache::CacheConfig;
use self::catalog::CatalogConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

pub use self::app::CorsConfig;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (base file + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Catalog data locations and mutation policy.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Database cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// Merges the given file with an optional `config/{env}` overlay and
    /// environment variables prefixed with `SPOOLDB__` (e.g.
    /// `SPOOLDB__CATALOG__DATA_ROOT`). Missing files are not an error.
    pub fn load(path: &str, env: Option<&str>) -> Result<Self, AppError> {
        let mut builder =
            config::Config::builder().add_source(config::File::with_name(path).required(false));

        if let Some(env) = env {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("SPOOLDB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AppConfig::load("does/not/exist", None).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.catalog.data_root, "./data");
        assert_eq!(config.catalog.stores_root, "./stores");
        assert!(!config.catalog.read_only);
        assert!(config.cache.prime_on_startup);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("spooldb-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("custom.toml");
        std::fs::write(
            &path,
            "[catalog]\ndata_root = \"/srv/filaments\"\nread_only = true\n\n[server]\nport = 9000\n",
        )
        .unwrap();

        let config = AppConfig::load(path.to_str().unwrap(), None).unwrap();
        assert_eq!(config.catalog.data_root, "/srv/filaments");
        assert!(config.catalog.read_only);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.level, "info");

        std::fs::remove_dir_all(dir).ok();
    }
}
