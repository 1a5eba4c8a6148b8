//! Single-slot catalog cache with single-flight builds.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::Utc;
use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use spooldb_core::result::AppResult;

use crate::loader::DatabaseLoader;
use crate::snapshot::CatalogSnapshot;

/// Holds the most recently built catalog.
///
/// At most one build runs at a time. Callers of [`get`](Self::get) that find
/// the slot empty queue on the build guard and, once through, reuse whatever
/// the previous holder stored instead of building again.
pub struct DatabaseCache {
    /// The single slot, keyed by `()`. Unbounded and without expiry since
    /// only one key ever exists.
    slot: Cache<(), Arc<CatalogSnapshot>>,
    /// Held for the whole duration of a build.
    build_guard: Mutex<()>,
    /// Source of fresh databases.
    loader: Arc<dyn DatabaseLoader>,
    /// Number of successful builds so far.
    generation: AtomicU64,
}

impl fmt::Debug for DatabaseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseCache")
            .field("cached", &self.slot.contains_key(&()))
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish()
    }
}

impl DatabaseCache {
    /// Create an empty cache over the given loader.
    pub fn new(loader: Arc<dyn DatabaseLoader>) -> Self {
        Self {
            slot: Cache::builder().initial_capacity(1).build(),
            build_guard: Mutex::new(()),
            loader,
            generation: AtomicU64::new(0),
        }
    }

    /// The cached snapshot, building it first if the slot is empty.
    pub async fn get(&self) -> AppResult<Arc<CatalogSnapshot>> {
        if let Some(snapshot) = self.slot.get(&()).await {
            return Ok(snapshot);
        }

        let _guard = self.build_guard.lock().await;
        if let Some(snapshot) = self.slot.get(&()).await {
            debug!(generation = snapshot.generation, "Reusing snapshot built while waiting");
            return Ok(snapshot);
        }

        self.build().await
    }

    /// Rebuild unconditionally and replace the cached snapshot.
    ///
    /// On failure the previous snapshot stays in place and the error is
    /// returned.
    pub async fn refresh(&self) -> AppResult<Arc<CatalogSnapshot>> {
        let _guard = self.build_guard.lock().await;
        self.build().await
    }

    /// The cached snapshot without building.
    pub async fn peek(&self) -> Option<Arc<CatalogSnapshot>> {
        self.slot.get(&()).await
    }

    /// Drop the cached snapshot so the next `get` rebuilds.
    pub async fn invalidate(&self) {
        let _guard = self.build_guard.lock().await;
        self.slot.invalidate(&()).await;
        debug!("Catalog cache invalidated");
    }

    /// Build the catalog at process start.
    pub async fn prime(&self) -> AppResult<Arc<CatalogSnapshot>> {
        let snapshot = self.get().await?;
        let stats = snapshot.database.stats();
        info!(
            brands = stats.brands,
            filaments = stats.filaments,
            colors = stats.colors,
            stores = stats.stores,
            "Catalog cache primed"
        );
        Ok(snapshot)
    }

    /// Number of successful builds so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Run one build and store it. The caller must hold the build guard.
    async fn build(&self) -> AppResult<Arc<CatalogSnapshot>> {
        let started = Instant::now();
        let database = match self.loader.load().await {
            Ok(database) => database,
            Err(e) => {
                error!(error = %e, "Catalog build failed; keeping previous snapshot");
                return Err(e);
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let snapshot = Arc::new(CatalogSnapshot {
            database,
            built_at: Utc::now(),
            build_millis: started.elapsed().as_millis() as u64,
            generation,
        });
        self.slot.insert((), Arc::clone(&snapshot)).await;

        info!(
            generation,
            build_millis = snapshot.build_millis,
            "Catalog snapshot stored"
        );
        Ok(snapshot)
    }
}
