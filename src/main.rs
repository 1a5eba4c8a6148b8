//! SpoolDB Server: filament catalog over a directory tree.
//!
//! Main entry point that loads configuration, sets up logging and starts the
//! HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use spooldb_core::AppError;
use spooldb_core::config::AppConfig;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!("Starting SpoolDB v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = spooldb_api::run_server(config).await {
        tracing::error!(kind = %e.kind, "Server error: {}", e.message);
        std::process::exit(1);
    }
}

/// Load configuration from file, environment overlay and `SPOOLDB__*`
/// variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("SPOOLDB_CONFIG").unwrap_or_else(|_| "config/default".to_string());
    let env = std::env::var("SPOOLDB_ENV").ok();

    AppConfig::load(&config_path, env.as_deref())
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}
