//! Temporary data trees for unit tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use spooldb_core::traits::RecordStore;
use spooldb_storage::LocalRecordStore;

use crate::aggregator::CatalogAggregator;
use crate::locks::PathLocks;
use crate::repository::{
    BrandRepository, FilamentRepository, MaterialRepository, StoreRepository, VariantRepository,
};

pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub data: Arc<dyn RecordStore>,
    pub stores: Arc<dyn RecordStore>,
    pub locks: Arc<PathLocks>,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();
        std::fs::create_dir(dir.path().join("stores")).unwrap();
        let data: Arc<dyn RecordStore> = Arc::new(LocalRecordStore::new(dir.path().join("data")));
        let stores: Arc<dyn RecordStore> =
            Arc::new(LocalRecordStore::new(dir.path().join("stores")));
        Self {
            dir,
            data,
            stores,
            locks: Arc::new(PathLocks::new()),
        }
    }

    pub fn data_path(&self, rel: &str) -> PathBuf {
        self.dir.path().join("data").join(rel)
    }

    pub fn stores_path(&self, rel: &str) -> PathBuf {
        self.dir.path().join("stores").join(rel)
    }

    /// Write a raw file under the data root, creating parents.
    pub fn put(&self, rel: &str, contents: &str) {
        write(&self.data_path(rel), contents);
    }

    /// Write a raw file under the store root, creating parents.
    pub fn put_store(&self, rel: &str, contents: &str) {
        write(&self.stores_path(rel), contents);
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.data_path(rel)).unwrap()
    }

    pub fn aggregator(&self) -> CatalogAggregator {
        CatalogAggregator::new(self.data.clone(), self.stores.clone())
    }

    pub fn brands(&self) -> BrandRepository {
        BrandRepository::new(self.data.clone(), self.locks.clone())
    }

    pub fn materials(&self) -> MaterialRepository {
        MaterialRepository::new(self.data.clone(), self.locks.clone())
    }

    pub fn filaments(&self) -> FilamentRepository {
        FilamentRepository::new(self.data.clone(), self.locks.clone())
    }

    pub fn variants(&self) -> VariantRepository {
        VariantRepository::new(self.data.clone(), self.locks.clone())
    }

    pub fn store_repo(&self) -> StoreRepository {
        StoreRepository::new(self.stores.clone(), self.locks.clone())
    }

    /// A brand with one material, filament and color, written by hand.
    pub fn seed_color(&self) {
        self.put(
            "Acme_3D/brand.json",
            r#"{"brand":"Acme 3D","website":"","logo":"","origin":"DE"}"#,
        );
        self.put("Acme_3D/PLA/material.json", r#"{"material":"PLA"}"#);
        self.put(
            "Acme_3D/PLA/PLA_Basic/filament.json",
            r#"{"name":"PLA Basic","density":1.24}"#,
        );
        self.put(
            "Acme_3D/PLA/PLA_Basic/Black/variant.json",
            r##"{"color_name":"Black","color_hex":"#000000"}"##,
        );
        self.put(
            "Acme_3D/PLA/PLA_Basic/Black/sizes.json",
            r#"[{"filament_weight":1000,"diameter":1.75,"purchase_links":[{"store_id":"amazon","url":"https://amazon.example/pla"}]},{"filament_weight":250,"diameter":1.75}]"#,
        );
        self.put_store(
            "amazon/store.json",
            r#"{"id":"amazon","name":"Amazon","storefront_url":"https://amazon.example","ships_from":["US"],"ships_to":["US"]}"#,
        );
    }
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}
