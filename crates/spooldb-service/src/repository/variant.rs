//! Color directories inside a filament, each holding `variant.json` and
//! `sizes.json`.

use std::sync::Arc;

use tracing::info;

use spooldb_core::traits::{RecordStore, RecordStoreExt, join_path};
use spooldb_core::{AppError, AppResult, ErrorKind};
use spooldb_entity::{Size, Variant, VariantDocument, VariantInput};

use super::{DATA_LOCKS, create_entity_dir, load_or_default, lock_key, relocate, require_dir};
use crate::layout::{SIZES_FILE, VARIANT_FILE, dir_key};
use crate::locks::PathLocks;

/// Creates and updates colors and edits their size lists.
#[derive(Debug, Clone)]
pub struct VariantRepository {
    store: Arc<dyn RecordStore>,
    locks: Arc<PathLocks>,
}

impl VariantRepository {
    /// Create a repository over the data root.
    pub fn new(store: Arc<dyn RecordStore>, locks: Arc<PathLocks>) -> Self {
        Self { store, locks }
    }

    /// Directory of a filament, checking that it exists.
    async fn filament_dir(&self, brand: &str, material: &str, filament: &str) -> AppResult<String> {
        let dir = join_path(&[
            &dir_key("Brand", brand)?,
            &dir_key("Material", material)?,
            &dir_key("Filament", filament)?,
        ]);
        require_dir(self.store.as_ref(), "Filament", &dir).await?;
        Ok(dir)
    }

    /// Write both files of a color directory.
    async fn write_parts(&self, dir: &str, variant: &Variant, sizes: &[Size]) -> AppResult<()> {
        self.store
            .write_json(&join_path(&[dir, VARIANT_FILE]), variant)
            .await?;
        self.store
            .write_json(&join_path(&[dir, SIZES_FILE]), &sizes)
            .await
    }

    /// Read both files of an existing color.
    pub async fn load(
        &self,
        brand: &str,
        material: &str,
        filament: &str,
        color: &str,
    ) -> AppResult<(VariantDocument, Vec<Size>)> {
        let dir = join_path(&[
            &dir_key("Brand", brand)?,
            &dir_key("Material", material)?,
            &dir_key("Filament", filament)?,
            &dir_key("Color", color)?,
        ]);
        let variant_path = join_path(&[&dir, VARIANT_FILE]);
        let sizes_path = join_path(&[&dir, SIZES_FILE]);
        tokio::try_join!(
            self.store.read_json::<VariantDocument>(&variant_path),
            self.store.read_json::<Vec<Size>>(&sizes_path),
        )
    }

    /// Create a color inside an existing filament.
    pub async fn create(
        &self,
        brand: &str,
        material: &str,
        filament: &str,
        input: VariantInput,
    ) -> AppResult<String> {
        let filament_dir = self.filament_dir(brand, material, filament).await?;
        let dir = join_path(&[&filament_dir, &dir_key("Color", &input.color_name)?]);
        let _guard = self.locks.lock(&lock_key(DATA_LOCKS, &dir)).await;

        create_entity_dir(self.store.as_ref(), "Color", &dir).await?;
        let (variant, sizes) = input.into_parts(Default::default());
        self.write_parts(&dir, &variant, &sizes).await?;

        info!(color = %variant.color_name, sizes = sizes.len(), path = %dir, "Created color");
        Ok(dir)
    }

    /// Update the color stored under `current`. Both `variant.json` and
    /// `sizes.json` are overwritten; the directory is renamed first when the
    /// color name maps to a different key.
    pub async fn update(
        &self,
        brand: &str,
        material: &str,
        filament: &str,
        current: &str,
        input: VariantInput,
    ) -> AppResult<String> {
        let filament_dir = self.filament_dir(brand, material, filament).await?;
        let current_key = dir_key("Color", current)?;
        let target_key = dir_key("Color", &input.color_name)?;
        let from_lock = lock_key(DATA_LOCKS, &join_path(&[&filament_dir, &current_key]));
        let to_lock = lock_key(DATA_LOCKS, &join_path(&[&filament_dir, &target_key]));
        let _guard = self
            .locks
            .lock_all(&[from_lock.as_str(), to_lock.as_str()])
            .await;

        let existing: Variant = load_or_default(
            self.store.as_ref(),
            &join_path(&[&filament_dir, &current_key, VARIANT_FILE]),
        )
        .await?;

        let dir = relocate(
            self.store.as_ref(),
            "Color",
            &filament_dir,
            &current_key,
            &target_key,
        )
        .await?;
        let (variant, sizes) = input.into_parts(existing.extra);
        self.write_parts(&dir, &variant, &sizes).await?;

        info!(color = %variant.color_name, from = %current_key, path = %dir, "Updated color");
        Ok(dir)
    }

    /// Remove the size at `index` from a color's `sizes.json`.
    ///
    /// Entries are handled as raw JSON so that sizes written by other tools
    /// survive unchanged.
    pub async fn delete_size(
        &self,
        brand: &str,
        material: &str,
        filament: &str,
        color: &str,
        index: usize,
    ) -> AppResult<String> {
        let filament_dir = self.filament_dir(brand, material, filament).await?;
        let dir = join_path(&[&filament_dir, &dir_key("Color", color)?]);
        let _guard = self.locks.lock(&lock_key(DATA_LOCKS, &dir)).await;

        require_dir(self.store.as_ref(), "Color", &dir).await?;
        let sizes_path = join_path(&[&dir, SIZES_FILE]);
        let mut sizes = match self.store.read_json_value(&sizes_path).await {
            Ok(serde_json::Value::Array(sizes)) => sizes,
            Ok(_) => {
                return Err(AppError::parse(format!(
                    "'{sizes_path}' does not hold a list of sizes"
                )));
            }
            Err(e) if e.is(ErrorKind::NotFound) => {
                return Err(AppError::not_found(format!("No sizes file found at '{sizes_path}'")));
            }
            Err(e) => return Err(e),
        };

        if index >= sizes.len() {
            return Err(AppError::out_of_range(format!(
                "Size index {index} is out of range for '{dir}' ({} sizes)",
                sizes.len()
            )));
        }
        sizes.remove(index);
        self.store
            .write_json_value(&sizes_path, &serde_json::Value::Array(sizes))
            .await?;

        info!(path = %dir, index, "Deleted size");
        Ok(dir)
    }
}
