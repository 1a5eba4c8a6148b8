//! Brand directories directly under the data root.

use std::sync::Arc;

use tracing::info;

use spooldb_core::AppResult;
use spooldb_core::traits::{RecordStore, RecordStoreExt, join_path};
use spooldb_entity::{BrandDocument, BrandInput, LogoUpload};

use super::{DATA_LOCKS, create_entity_dir, lock_key, relocate, resolve_logo};
use crate::layout::{BRAND_FILE, dir_key};
use crate::locks::PathLocks;

/// Creates and updates brands.
#[derive(Debug, Clone)]
pub struct BrandRepository {
    store: Arc<dyn RecordStore>,
    locks: Arc<PathLocks>,
}

impl BrandRepository {
    /// Create a repository over the data root.
    pub fn new(store: Arc<dyn RecordStore>, locks: Arc<PathLocks>) -> Self {
        Self { store, locks }
    }

    /// Read `brand.json` of an existing brand.
    pub async fn load(&self, brand: &str) -> AppResult<BrandDocument> {
        let key = dir_key("Brand", brand)?;
        self.store.read_json(&join_path(&[&key, BRAND_FILE])).await
    }

    /// Create a brand directory with its `brand.json` and optional logo.
    pub async fn create(&self, input: BrandInput, logo: Option<LogoUpload>) -> AppResult<String> {
        let key = dir_key("Brand", &input.brand)?;
        if let Some(upload) = &logo {
            upload.stored_name()?;
        }
        let _guard = self.locks.lock(&lock_key(DATA_LOCKS, &key)).await;

        create_entity_dir(self.store.as_ref(), "Brand", &key).await?;
        let logo_name = resolve_logo(self.store.as_ref(), &key, logo, None).await?;
        let doc = input.into_document(logo_name);
        self.store
            .write_json(&join_path(&[&key, BRAND_FILE]), &doc)
            .await?;

        info!(brand = %doc.brand, path = %key, "Created brand");
        Ok(key)
    }

    /// Update the brand currently stored under `current`, renaming its
    /// directory when the display name maps to a different key.
    pub async fn update(
        &self,
        current: &str,
        input: BrandInput,
        logo: Option<LogoUpload>,
    ) -> AppResult<String> {
        let current_key = dir_key("Brand", current)?;
        let target_key = dir_key("Brand", &input.brand)?;
        if let Some(upload) = &logo {
            upload.stored_name()?;
        }
        let from_lock = lock_key(DATA_LOCKS, &current_key);
        let to_lock = lock_key(DATA_LOCKS, &target_key);
        let _guard = self.locks.lock_all(&[from_lock.as_str(), to_lock.as_str()]).await;

        let dir = relocate(self.store.as_ref(), "Brand", "", &current_key, &target_key).await?;
        let keep = input.logo.clone();
        let logo_name = resolve_logo(self.store.as_ref(), &dir, logo, keep).await?;
        let doc = input.into_document(logo_name);
        self.store
            .write_json(&join_path(&[&dir, BRAND_FILE]), &doc)
            .await?;

        info!(brand = %doc.brand, from = %current_key, path = %dir, "Updated brand");
        Ok(dir)
    }
}
