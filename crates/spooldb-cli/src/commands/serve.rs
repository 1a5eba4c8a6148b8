//! Start the SpoolDB server.

use clap::Args;

use spooldb_core::AppError;
use spooldb_core::config::AppConfig;

use crate::output;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Reject every mutation
    #[arg(long)]
    pub read_only: bool,

    /// Build the catalog on first request instead of at startup
    #[arg(long)]
    pub no_prime: bool,
}

impl ServeArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if self.read_only {
            config.catalog.read_only = true;
        }
        if self.no_prime {
            config.cache.prime_on_startup = false;
        }
    }
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    args.apply(&mut config);

    println!("Starting SpoolDB server...");
    output::print_kv("Address", &format!("{}:{}", config.server.host, config.server.port));
    output::print_kv("Data root", &config.catalog.data_root);
    output::print_kv("Stores root", &config.catalog.stores_root);
    output::print_kv("Read-only", &config.catalog.read_only.to_string());

    spooldb_api::run_server(config).await
}
