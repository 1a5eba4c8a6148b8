//! Filament directories inside a material.

use std::sync::Arc;

use tracing::info;

use spooldb_core::AppResult;
use spooldb_core::traits::{RecordStore, RecordStoreExt, join_path};
use spooldb_entity::{FilamentDocument, FilamentInput};

use super::{DATA_LOCKS, create_entity_dir, load_or_default, lock_key, relocate, require_dir};
use crate::layout::{FILAMENT_FILE, dir_key};
use crate::locks::PathLocks;

/// Creates and updates filaments.
#[derive(Debug, Clone)]
pub struct FilamentRepository {
    store: Arc<dyn RecordStore>,
    locks: Arc<PathLocks>,
}

impl FilamentRepository {
    /// Create a repository over the data root.
    pub fn new(store: Arc<dyn RecordStore>, locks: Arc<PathLocks>) -> Self {
        Self { store, locks }
    }

    /// Directory of a material, checking that the brand and material exist.
    async fn material_dir(&self, brand: &str, material: &str) -> AppResult<String> {
        let brand_key = dir_key("Brand", brand)?;
        require_dir(self.store.as_ref(), "Brand", &brand_key).await?;
        let dir = join_path(&[&brand_key, &dir_key("Material", material)?]);
        require_dir(self.store.as_ref(), "Material", &dir).await?;
        Ok(dir)
    }

    /// Read `filament.json` of an existing filament.
    pub async fn load(
        &self,
        brand: &str,
        material: &str,
        filament: &str,
    ) -> AppResult<FilamentDocument> {
        let path = join_path(&[
            &dir_key("Brand", brand)?,
            &dir_key("Material", material)?,
            &dir_key("Filament", filament)?,
            FILAMENT_FILE,
        ]);
        self.store.read_json(&path).await
    }

    /// Create a filament inside an existing material.
    pub async fn create(
        &self,
        brand: &str,
        material: &str,
        input: FilamentInput,
    ) -> AppResult<String> {
        let material_dir = self.material_dir(brand, material).await?;
        let dir = join_path(&[&material_dir, &dir_key("Filament", &input.name)?]);
        let _guard = self.locks.lock(&lock_key(DATA_LOCKS, &dir)).await;

        create_entity_dir(self.store.as_ref(), "Filament", &dir).await?;
        let doc = input.into_document(Default::default());
        self.store
            .write_json(&join_path(&[&dir, FILAMENT_FILE]), &doc)
            .await?;

        info!(filament = %doc.name, path = %dir, "Created filament");
        Ok(dir)
    }

    /// Update the filament stored under `current`, renaming its directory
    /// when the name maps to a different key.
    pub async fn update(
        &self,
        brand: &str,
        material: &str,
        current: &str,
        input: FilamentInput,
    ) -> AppResult<String> {
        let material_dir = self.material_dir(brand, material).await?;
        let current_key = dir_key("Filament", current)?;
        let target_key = dir_key("Filament", &input.name)?;
        let from_lock = lock_key(DATA_LOCKS, &join_path(&[&material_dir, &current_key]));
        let to_lock = lock_key(DATA_LOCKS, &join_path(&[&material_dir, &target_key]));
        let _guard = self
            .locks
            .lock_all(&[from_lock.as_str(), to_lock.as_str()])
            .await;

        let existing: FilamentDocument = load_or_default(
            self.store.as_ref(),
            &join_path(&[&material_dir, &current_key, FILAMENT_FILE]),
        )
        .await?;

        let dir = relocate(
            self.store.as_ref(),
            "Filament",
            &material_dir,
            &current_key,
            &target_key,
        )
        .await?;
        let doc = input.into_document(existing.extra);
        self.store
            .write_json(&join_path(&[&dir, FILAMENT_FILE]), &doc)
            .await?;

        info!(filament = %doc.name, from = %current_key, path = %dir, "Updated filament");
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spooldb_core::ErrorKind;

    use crate::test_support::Fixture;

    fn silk() -> FilamentInput {
        FilamentInput {
            name: "Silk PLA".into(),
            diameter_tolerance: Some(0.02),
            density: Some(1.24),
            max_dry_temperature: Some(55.0),
            data_sheet_url: Some("https://acme.example/tds.pdf".into()),
            safety_sheet_url: None,
            discontinued: Some(true),
        }
    }

    #[tokio::test]
    async fn test_create_round_trip() {
        let fx = Fixture::new();
        fx.seed_color();
        let path = fx.filaments().create("Acme_3D", "PLA", silk()).await.unwrap();
        assert_eq!(path, "Acme_3D/PLA/Silk_PLA");

        let db = fx.aggregator().aggregate().await.unwrap();
        let filament = &db.brands["Acme_3D"].materials["PLA"].filaments["Silk_PLA"];
        assert_eq!(filament.name, "Silk PLA");
        assert_eq!(filament.diameter_tolerance, Some(0.02));
        assert_eq!(filament.max_dry_temperature, Some(55.0));
        assert_eq!(
            filament.data_sheet_url.as_deref(),
            Some("https://acme.example/tds.pdf")
        );
        assert_eq!(filament.safety_sheet_url, None);
        assert!(filament.is_discontinued());
        assert!(filament.colors.is_empty());
    }

    #[tokio::test]
    async fn test_create_requires_material() {
        let fx = Fixture::new();
        fx.seed_color();
        let err = fx.filaments().create("Acme_3D", "ABS", silk()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.contains("Acme_3D/ABS"));
    }

    #[tokio::test]
    async fn test_rename_collision() {
        let fx = Fixture::new();
        fx.seed_color();
        fx.filaments().create("Acme_3D", "PLA", silk()).await.unwrap();

        let input = FilamentInput {
            name: "PLA Basic".into(),
            ..Default::default()
        };
        let err = fx
            .filaments()
            .update("Acme_3D", "PLA", "Silk_PLA", input)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyExists);
        assert!(fx.data_path("Acme_3D/PLA/Silk_PLA/filament.json").exists());
        assert_eq!(
            fx.filaments().load("Acme_3D", "PLA", "PLA_Basic").await.unwrap().density,
            Some(1.24)
        );
    }

    #[tokio::test]
    async fn test_concurrent_updates_of_one_filament_both_land() {
        let fx = Fixture::new();
        fx.seed_color();
        let repo = fx.filaments();

        let a = repo.update(
            "Acme_3D",
            "PLA",
            "PLA_Basic",
            FilamentInput {
                name: "PLA Basic".into(),
                density: Some(1.20),
                ..Default::default()
            },
        );
        let b = repo.update(
            "Acme_3D",
            "PLA",
            "PLA_Basic",
            FilamentInput {
                name: "PLA Basic".into(),
                density: Some(1.30),
                ..Default::default()
            },
        );
        let (a, b) = tokio::join!(a, b);
        a.unwrap();
        b.unwrap();

        let density = repo.load("Acme_3D", "PLA", "PLA_Basic").await.unwrap().density;
        assert!(density == Some(1.20) || density == Some(1.30));
        assert_eq!(fx.data.list_files("Acme_3D/PLA/PLA_Basic").await.unwrap(), vec!["filament.json"]);
    }
}
