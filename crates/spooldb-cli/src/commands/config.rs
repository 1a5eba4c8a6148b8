//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use spooldb_core::AppError;
use spooldb_core::config::AppConfig;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Check that the configured roots exist
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config_path: &str,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => output::print_item(config, format),
        ConfigCommand::Validate => {
            output::print_success(&format!("Configuration '{config_path}' is valid"));
            output::print_kv(
                "Server",
                &format!("{}:{}", config.server.host, config.server.port),
            );
            let mut missing = 0;
            for (label, root) in [
                ("Data root", &config.catalog.data_root),
                ("Stores root", &config.catalog.stores_root),
            ] {
                if std::path::Path::new(root).is_dir() {
                    output::print_kv(label, root);
                } else {
                    output::print_warning(&format!("{label} '{root}' does not exist"));
                    missing += 1;
                }
            }
            if missing > 0 && config.catalog.read_only {
                return Err(AppError::configuration(
                    "Read-only catalog roots must exist before the server starts",
                ));
            }
        }
    }

    Ok(())
}
