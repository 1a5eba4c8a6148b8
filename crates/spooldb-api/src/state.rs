//! Application state shared across all handlers and extractors.

use std::sync::Arc;

use spooldb_cache::DatabaseCache;
use spooldb_core::AppResult;
use spooldb_core::config::AppConfig;
use spooldb_core::traits::RecordStore;
use spooldb_service::{
    BrandRepository, CatalogAggregator, FilamentRepository, IntegrityChecker, MaterialRepository,
    PathLocks, StoreRepository, VariantRepository,
};
use spooldb_storage::LocalRecordStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// The catalog snapshot every read is served from
    pub cache: Arc<DatabaseCache>,

    pub brands: Arc<BrandRepository>,
    pub materials: Arc<MaterialRepository>,
    pub filaments: Arc<FilamentRepository>,
    pub variants: Arc<VariantRepository>,
    pub stores: Arc<StoreRepository>,
    pub integrity: Arc<IntegrityChecker>,
}

impl AppState {
    /// Open the configured data and store roots on the local filesystem.
    ///
    /// Missing roots are created unless the catalog is read-only.
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let data = LocalRecordStore::new(&config.catalog.data_root);
        let stores = LocalRecordStore::new(&config.catalog.stores_root);
        if !config.catalog.read_only {
            data.ensure_root().await?;
            stores.ensure_root().await?;
        }
        Ok(Self::with_stores(config, Arc::new(data), Arc::new(stores)))
    }

    /// Wire the state over arbitrary record stores.
    pub fn with_stores(
        config: AppConfig,
        data: Arc<dyn RecordStore>,
        stores: Arc<dyn RecordStore>,
    ) -> Self {
        let locks = Arc::new(PathLocks::new());
        let aggregator = CatalogAggregator::new(Arc::clone(&data), Arc::clone(&stores));

        Self {
            config: Arc::new(config),
            cache: Arc::new(DatabaseCache::new(Arc::new(aggregator))),
            brands: Arc::new(BrandRepository::new(Arc::clone(&data), Arc::clone(&locks))),
            materials: Arc::new(MaterialRepository::new(Arc::clone(&data), Arc::clone(&locks))),
            filaments: Arc::new(FilamentRepository::new(Arc::clone(&data), Arc::clone(&locks))),
            variants: Arc::new(VariantRepository::new(Arc::clone(&data), Arc::clone(&locks))),
            stores: Arc::new(StoreRepository::new(Arc::clone(&stores), Arc::clone(&locks))),
            integrity: Arc::new(IntegrityChecker::new(data, stores)),
        }
    }
}
