//! The source the cache builds from.

use async_trait::async_trait;

use spooldb_core::result::AppResult;
use spooldb_entity::FilamentDatabase;

/// Produces a complete database, or fails without a partial result.
#[async_trait]
pub trait DatabaseLoader: Send + Sync + 'static {
    /// Build the database from its source of truth.
    async fn load(&self) -> AppResult<FilamentDatabase>;
}
