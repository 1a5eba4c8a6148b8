//! Walks the data tree and the store tree into one [`FilamentDatabase`].
//!
//! Every level follows the same steps: list subdirectories, check the
//! level's marker file, load it, descend, and collect the results into a
//! map keyed by directory name. Siblings are loaded concurrently. A
//! directory without its marker file is skipped; a marker file that does not
//! parse fails the whole walk.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, info};

use spooldb_cache::DatabaseLoader;
use spooldb_core::traits::{RecordStore, RecordStoreExt, join_path};
use spooldb_core::{AppError, AppResult, ErrorKind};
use spooldb_entity::{
    Brand, BrandDocument, Color, Filament, FilamentDatabase, FilamentDocument, Material,
    MaterialDocument, Size, Store, StoreDocument, Variant,
};

use crate::layout::{
    BRAND_FILE, FILAMENT_FILE, MATERIAL_FILE, SIZES_FILE, STORE_FILE, VARIANT_FILE,
};

/// Builds the catalog from the record stores.
#[derive(Debug, Clone)]
pub struct CatalogAggregator {
    /// Brand hierarchy.
    data: Arc<dyn RecordStore>,
    /// Flat store directory.
    stores: Arc<dyn RecordStore>,
}

impl CatalogAggregator {
    /// Create an aggregator over the brand and store trees.
    pub fn new(data: Arc<dyn RecordStore>, stores: Arc<dyn RecordStore>) -> Self {
        Self { data, stores }
    }

    /// Walk both trees and assemble the database.
    pub async fn aggregate(&self) -> AppResult<FilamentDatabase> {
        let started = Instant::now();
        let (brands, stores) = tokio::try_join!(self.load_brands(), self.load_stores())?;

        info!(
            brands = brands.len(),
            stores = stores.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Aggregated filament database"
        );
        Ok(FilamentDatabase { brands, stores })
    }

    async fn load_brands(&self) -> AppResult<BTreeMap<String, Brand>> {
        let dirs = list_root(self.data.as_ref(), "Data root").await?;
        let loaded = try_join_all(dirs.iter().map(|key| self.load_brand(key))).await?;
        Ok(loaded.into_iter().flatten().collect())
    }

    async fn load_brand(&self, key: &str) -> AppResult<Option<(String, Brand)>> {
        let marker = join_path(&[key, BRAND_FILE]);
        if !self.data.exists(&marker).await? {
            debug!(path = key, "Skipping directory without brand.json");
            return Ok(None);
        }

        let (doc, logo, materials) = tokio::try_join!(
            self.data.read_json::<BrandDocument>(&marker),
            self.data.find_logo(key),
            self.load_materials(key),
        )?;
        Ok(Some((
            key.to_string(),
            Brand::from_document(key, doc, logo, materials),
        )))
    }

    async fn load_materials(&self, brand: &str) -> AppResult<BTreeMap<String, Material>> {
        let dirs = self.data.list_dirs(brand).await?;
        let loaded = try_join_all(dirs.iter().map(|key| self.load_material(brand, key))).await?;
        Ok(loaded.into_iter().flatten().collect())
    }

    async fn load_material(&self, brand: &str, key: &str) -> AppResult<Option<(String, Material)>> {
        let dir = join_path(&[brand, key]);
        let marker = join_path(&[&dir, MATERIAL_FILE]);
        if !self.data.exists(&marker).await? {
            debug!(path = %dir, "Skipping directory without material.json");
            return Ok(None);
        }

        let (doc, filaments) = tokio::try_join!(
            self.data.read_json::<MaterialDocument>(&marker),
            self.load_filaments(&dir),
        )?;
        Ok(Some((
            key.to_string(),
            Material::from_document(key, doc, filaments),
        )))
    }

    async fn load_filaments(&self, material_dir: &str) -> AppResult<BTreeMap<String, Filament>> {
        let dirs = self.data.list_dirs(material_dir).await?;
        let loaded =
            try_join_all(dirs.iter().map(|key| self.load_filament(material_dir, key))).await?;
        Ok(loaded.into_iter().flatten().collect())
    }

    async fn load_filament(
        &self,
        material_dir: &str,
        key: &str,
    ) -> AppResult<Option<(String, Filament)>> {
        let dir = join_path(&[material_dir, key]);
        let marker = join_path(&[&dir, FILAMENT_FILE]);
        if !self.data.exists(&marker).await? {
            debug!(path = %dir, "Skipping directory without filament.json");
            return Ok(None);
        }

        let (doc, colors) = tokio::try_join!(
            self.data.read_json::<FilamentDocument>(&marker),
            self.load_colors(&dir),
        )?;
        Ok(Some((
            key.to_string(),
            Filament::from_document(key, doc, colors),
        )))
    }

    async fn load_colors(&self, filament_dir: &str) -> AppResult<BTreeMap<String, Color>> {
        let dirs = self.data.list_dirs(filament_dir).await?;
        let loaded = try_join_all(dirs.iter().map(|key| self.load_color(filament_dir, key))).await?;
        Ok(loaded.into_iter().flatten().collect())
    }

    async fn load_color(&self, filament_dir: &str, key: &str) -> AppResult<Option<(String, Color)>> {
        let dir = join_path(&[filament_dir, key]);
        let variant_path = join_path(&[&dir, VARIANT_FILE]);
        let sizes_path = join_path(&[&dir, SIZES_FILE]);

        let (has_variant, has_sizes) = tokio::try_join!(
            self.data.exists(&variant_path),
            self.data.exists(&sizes_path),
        )?;
        if !has_variant || !has_sizes {
            debug!(path = %dir, "Skipping directory without variant.json and sizes.json");
            return Ok(None);
        }

        let (variant, sizes) = tokio::try_join!(
            self.data.read_json::<Variant>(&variant_path),
            self.data.read_json::<Vec<Size>>(&sizes_path),
        )?;
        Ok(Some((
            key.to_string(),
            Color {
                name: key.to_string(),
                variant,
                sizes,
            },
        )))
    }

    async fn load_stores(&self) -> AppResult<BTreeMap<String, Store>> {
        let dirs = list_root(self.stores.as_ref(), "Store root").await?;
        let loaded = try_join_all(dirs.iter().map(|key| self.load_store(key))).await?;
        Ok(loaded.into_iter().flatten().collect())
    }

    async fn load_store(&self, key: &str) -> AppResult<Option<(String, Store)>> {
        let marker = join_path(&[key, STORE_FILE]);
        if !self.stores.exists(&marker).await? {
            debug!(path = key, "Skipping directory without store.json");
            return Ok(None);
        }

        let (doc, logo) = tokio::try_join!(
            self.stores.read_json::<StoreDocument>(&marker),
            self.stores.find_logo(key),
        )?;
        Ok(Some((key.to_string(), Store::from_document(key, doc, logo))))
    }
}

/// List a root directory, naming the root when it is missing.
async fn list_root(store: &dyn RecordStore, what: &str) -> AppResult<Vec<String>> {
    store.list_dirs("").await.map_err(|e| {
        if e.is(ErrorKind::NotFound) {
            AppError::not_found(format!("{what} '{}' does not exist", store.location()))
        } else {
            e
        }
    })
}

#[async_trait]
impl DatabaseLoader for CatalogAggregator {
    async fn load(&self) -> AppResult<FilamentDatabase> {
        self.aggregate().await
    }
}
