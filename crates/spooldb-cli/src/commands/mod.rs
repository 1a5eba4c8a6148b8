//! CLI command definitions and dispatch.

pub mod check;
pub mod config;
pub mod serve;
pub mod stores;
pub mod tree;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use spooldb_core::AppError;
use spooldb_core::config::AppConfig;
use spooldb_core::traits::RecordStore;
use spooldb_storage::LocalRecordStore;

use crate::output::OutputFormat;

/// SpoolDB: filament catalog stored as a directory tree
#[derive(Debug, Parser)]
#[command(name = "spooldb", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (extension optional)
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay, loaded from `config/<env>`
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the SpoolDB server
    Serve(serve::ServeArgs),
    /// Check folder names, marker files and store references
    Check(check::CheckArgs),
    /// List the brand hierarchy down to colors
    Tree(tree::TreeArgs),
    /// List stores
    Stores,
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Whether the server is being started.
    pub fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve(_))
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = self.load_config()?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Check(args) => check::execute(args, &config, self.format).await,
            Commands::Tree(args) => tree::execute(args, &config, self.format).await,
            Commands::Stores => stores::execute(&config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, &config, self.format),
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load(&self.config, self.env.as_deref())
    }
}

/// Open the data and store roots read-only; nothing is created.
pub fn open_roots(config: &AppConfig) -> (Arc<dyn RecordStore>, Arc<dyn RecordStore>) {
    (
        Arc::new(LocalRecordStore::new(&config.catalog.data_root)),
        Arc::new(LocalRecordStore::new(&config.catalog.stores_root)),
    )
}
