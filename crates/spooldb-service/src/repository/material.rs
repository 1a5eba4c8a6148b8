//! Material directories inside a brand.

use std::sync::Arc;

use tracing::info;

use spooldb_core::AppResult;
use spooldb_core::traits::{RecordStore, RecordStoreExt, join_path};
use spooldb_entity::{MaterialDocument, MaterialInput};

use super::{DATA_LOCKS, create_entity_dir, load_or_default, lock_key, relocate, require_dir};
use crate::layout::{MATERIAL_FILE, dir_key};
use crate::locks::PathLocks;

/// Creates and updates materials.
#[derive(Debug, Clone)]
pub struct MaterialRepository {
    store: Arc<dyn RecordStore>,
    locks: Arc<PathLocks>,
}

impl MaterialRepository {
    /// Create a repository over the data root.
    pub fn new(store: Arc<dyn RecordStore>, locks: Arc<PathLocks>) -> Self {
        Self { store, locks }
    }

    /// Read `material.json` of an existing material.
    pub async fn load(&self, brand: &str, material: &str) -> AppResult<MaterialDocument> {
        let path = join_path(&[
            &dir_key("Brand", brand)?,
            &dir_key("Material", material)?,
            MATERIAL_FILE,
        ]);
        self.store.read_json(&path).await
    }

    /// Create a material inside an existing brand.
    pub async fn create(&self, brand: &str, input: MaterialInput) -> AppResult<String> {
        let brand_key = dir_key("Brand", brand)?;
        let dir = join_path(&[&brand_key, &dir_key("Material", &input.material)?]);
        let _guard = self.locks.lock(&lock_key(DATA_LOCKS, &dir)).await;

        require_dir(self.store.as_ref(), "Brand", &brand_key).await?;
        create_entity_dir(self.store.as_ref(), "Material", &dir).await?;
        let doc = input.into_document(Default::default());
        self.store
            .write_json(&join_path(&[&dir, MATERIAL_FILE]), &doc)
            .await?;

        info!(material = %doc.material, path = %dir, "Created material");
        Ok(dir)
    }

    /// Update the material stored under `current`, renaming its directory
    /// when the name maps to a different key. Unknown keys already present in
    /// `material.json` are kept.
    pub async fn update(
        &self,
        brand: &str,
        current: &str,
        input: MaterialInput,
    ) -> AppResult<String> {
        let brand_key = dir_key("Brand", brand)?;
        let current_key = dir_key("Material", current)?;
        let target_key = dir_key("Material", &input.material)?;
        let from_lock = lock_key(DATA_LOCKS, &join_path(&[&brand_key, &current_key]));
        let to_lock = lock_key(DATA_LOCKS, &join_path(&[&brand_key, &target_key]));
        let _guard = self
            .locks
            .lock_all(&[from_lock.as_str(), to_lock.as_str()])
            .await;

        require_dir(self.store.as_ref(), "Brand", &brand_key).await?;
        let existing: MaterialDocument = load_or_default(
            self.store.as_ref(),
            &join_path(&[&brand_key, &current_key, MATERIAL_FILE]),
        )
        .await?;

        let dir = relocate(
            self.store.as_ref(),
            "Material",
            &brand_key,
            &current_key,
            &target_key,
        )
        .await?;
        let doc = input.into_document(existing.extra);
        self.store
            .write_json(&join_path(&[&dir, MATERIAL_FILE]), &doc)
            .await?;

        info!(material = %doc.material, from = %current_key, path = %dir, "Updated material");
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use spooldb_core::ErrorKind;
    use spooldb_entity::{GenericSlicerSettings, SlicerSettings};

    use crate::test_support::Fixture;

    fn petg() -> MaterialInput {
        MaterialInput {
            material: "PETG".into(),
            default_max_dry_temperature: Some(65.0),
            default_slicer_settings: Some(SlicerSettings {
                generic: Some(GenericSlicerSettings {
                    nozzle_temp: Some(240.0),
                    bed_temp: Some(f64::NAN),
                    ..Default::default()
                }),
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn test_create_round_trip() {
        let fx = Fixture::new();
        fx.seed_color();
        let path = fx.materials().create("Acme 3D", petg()).await.unwrap();
        assert_eq!(path, "Acme_3D/PETG");

        let db = fx.aggregator().aggregate().await.unwrap();
        let material = &db.brands["Acme_3D"].materials["PETG"];
        assert_eq!(material.material, "PETG");
        assert_eq!(material.default_max_dry_temperature, Some(65.0));
        let generic = material
            .default_slicer_settings
            .as_ref()
            .and_then(|s| s.generic.as_ref())
            .unwrap();
        assert_eq!(generic.nozzle_temp, Some(240.0));
        assert_eq!(generic.bed_temp, None);
    }

    #[tokio::test]
    async fn test_create_requires_brand() {
        let fx = Fixture::new();
        let err = fx.materials().create("Nobody", petg()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(!fx.data_path("Nobody").exists());
    }

    #[tokio::test]
    async fn test_create_existing_fails() {
        let fx = Fixture::new();
        fx.seed_color();
        let input = MaterialInput {
            material: "PLA".into(),
            ..Default::default()
        };
        let err = fx.materials().create("Acme_3D", input).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyExists);
        assert!(fx.read("Acme_3D/PLA/material.json").contains("PLA"));
    }

    #[tokio::test]
    async fn test_update_in_place_keeps_unknown_keys() {
        let fx = Fixture::new();
        fx.seed_color();
        fx.put(
            "Acme_3D/PLA/material.json",
            r#"{"material":"PLA","abrasive":false}"#,
        );

        let input = MaterialInput {
            material: "PLA".into(),
            default_max_dry_temperature: Some(50.0),
            ..Default::default()
        };
        let path = fx.materials().update("Acme_3D", "PLA", input).await.unwrap();
        assert_eq!(path, "Acme_3D/PLA");

        let raw: serde_json::Value =
            serde_json::from_str(&fx.read("Acme_3D/PLA/material.json")).unwrap();
        assert_eq!(
            raw,
            json!({ "material": "PLA", "default_max_dry_temperature": 50, "abrasive": false })
        );
    }

    #[tokio::test]
    async fn test_update_writes_integers_and_short_slicer_keys() {
        let fx = Fixture::new();
        fx.seed_color();
        let input: MaterialInput = serde_json::from_value(json!({
            "material": "PLA",
            "default_max_dry_temperature": 55,
            "default_slicer_settings": {
                "bambus": { "bed_temp": 60 },
                "orca": { "nozzle_temp": 210 }
            }
        }))
        .unwrap();
        fx.materials().update("Acme_3D", "PLA", input).await.unwrap();

        assert_eq!(
            fx.read("Acme_3D/PLA/material.json"),
            "{\n  \"material\": \"PLA\",\n  \"default_max_dry_temperature\": 55,\n  \"default_slicer_settings\": {\n    \"bambus\": {\n      \"bed_temp\": 60\n    },\n    \"orca\": {\n      \"nozzle_temp\": 210\n    }\n  }\n}"
        );
    }

    #[tokio::test]
    async fn test_update_renames_directory() {
        let fx = Fixture::new();
        fx.seed_color();
        let input = MaterialInput {
            material: "PLA+".into(),
            ..Default::default()
        };
        let path = fx.materials().update("Acme_3D", "PLA", input).await.unwrap();
        assert_eq!(path, "Acme_3D/PLA+");
        assert!(fx.data_path("Acme_3D/PLA+/PLA_Basic/Black/sizes.json").exists());
        assert_eq!(fx.materials().load("Acme_3D", "PLA+").await.unwrap().material, "PLA+");
    }

    #[tokio::test]
    async fn test_update_with_unreadable_json_fails() {
        let fx = Fixture::new();
        fx.seed_color();
        fx.put("Acme_3D/PLA/material.json", "{ broken");
        let input = MaterialInput {
            material: "PLA".into(),
            ..Default::default()
        };
        let err = fx.materials().update("Acme_3D", "PLA", input).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
    }
}
