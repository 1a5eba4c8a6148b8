//! A built database together with its build metadata.

use chrono::{DateTime, Utc};
use serde::Serialize;

use spooldb_entity::FilamentDatabase;

/// One successfully built catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSnapshot {
    /// The aggregated database.
    pub database: FilamentDatabase,
    /// When the build finished.
    pub built_at: DateTime<Utc>,
    /// How long the build took in milliseconds.
    pub build_millis: u64,
    /// Monotonic build counter, starting at 1 for the first build.
    pub generation: u64,
}
