//! Store directories under the store root.

use std::sync::Arc;

use tracing::info;

use spooldb_core::AppResult;
use spooldb_core::traits::{RecordStore, RecordStoreExt, join_path};
use spooldb_entity::{LogoUpload, StoreDocument, StoreInput};

use super::{STORE_LOCKS, create_entity_dir, load_or_default, lock_key, relocate, resolve_logo};
use crate::layout::{STORE_FILE, dir_key};
use crate::locks::PathLocks;

/// Creates and updates stores.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    store: Arc<dyn RecordStore>,
    locks: Arc<PathLocks>,
}

impl StoreRepository {
    /// Create a repository over the store root.
    pub fn new(store: Arc<dyn RecordStore>, locks: Arc<PathLocks>) -> Self {
        Self { store, locks }
    }

    /// Read `store.json` of an existing store.
    pub async fn load(&self, id: &str) -> AppResult<StoreDocument> {
        let key = dir_key("Store", id)?;
        self.store.read_json(&join_path(&[&key, STORE_FILE])).await
    }

    /// Create a store directory named after the store id.
    pub async fn create(&self, input: StoreInput, logo: Option<LogoUpload>) -> AppResult<String> {
        let key = dir_key("Store", &input.id)?;
        if let Some(upload) = &logo {
            upload.stored_name()?;
        }
        let _guard = self.locks.lock(&lock_key(STORE_LOCKS, &key)).await;

        create_entity_dir(self.store.as_ref(), "Store", &key).await?;
        let logo_name = resolve_logo(self.store.as_ref(), &key, logo, None).await?;
        let doc = input.into_document(logo_name, Default::default());
        self.store
            .write_json(&join_path(&[&key, STORE_FILE]), &doc)
            .await?;

        info!(store = %doc.id, path = %key, "Created store");
        Ok(key)
    }

    /// Update the store stored under `current`; a changed id renames the
    /// directory. Unknown keys in `store.json` are kept. References in
    /// `sizes.json` files are not rewritten.
    pub async fn update(
        &self,
        current: &str,
        input: StoreInput,
        logo: Option<LogoUpload>,
    ) -> AppResult<String> {
        let current_key = dir_key("Store", current)?;
        let target_key = dir_key("Store", &input.id)?;
        if let Some(upload) = &logo {
            upload.stored_name()?;
        }
        let from_lock = lock_key(STORE_LOCKS, &current_key);
        let to_lock = lock_key(STORE_LOCKS, &target_key);
        let _guard = self.locks.lock_all(&[from_lock.as_str(), to_lock.as_str()]).await;

        let existing: StoreDocument =
            load_or_default(self.store.as_ref(), &join_path(&[&current_key, STORE_FILE])).await?;
        let dir = relocate(self.store.as_ref(), "Store", "", &current_key, &target_key).await?;
        let keep = input.logo.clone();
        let logo_name = resolve_logo(self.store.as_ref(), &dir, logo, keep).await?;
        let doc = input.into_document(logo_name, existing.extra);
        self.store
            .write_json(&join_path(&[&dir, STORE_FILE]), &doc)
            .await?;

        info!(store = %doc.id, from = %current_key, path = %dir, "Updated store");
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use spooldb_core::ErrorKind;
    use spooldb_entity::OneOrMany;

    use crate::test_support::Fixture;

    fn printed_parts() -> StoreInput {
        StoreInput {
            id: "printed parts".into(),
            name: "Printed Parts".into(),
            storefront_url: "https://printedparts.example".into(),
            storefront_affiliate_link: None,
            logo: None,
            ships_from: OneOrMany::One("DE".into()),
            ships_to: OneOrMany::Many(vec!["DE".into(), "AT".into()]),
        }
    }

    #[tokio::test]
    async fn test_create_writes_document_and_logo() {
        let fx = Fixture::new();
        let upload = LogoUpload::new("pp.svg", b"<svg/>".to_vec());
        let path = fx.store_repo().create(printed_parts(), Some(upload)).await.unwrap();
        assert_eq!(path, "printed_parts");
        assert!(fx.stores_path("printed_parts/pp.svg").exists());

        let raw: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(fx.stores_path("printed_parts/store.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(
            raw,
            json!({
                "id": "printed parts",
                "name": "Printed Parts",
                "storefront_url": "https://printedparts.example",
                "storefront_affiliate_link": "",
                "logo": "pp.svg",
                "ships_from": ["DE"],
                "ships_to": ["DE", "AT"]
            })
        );

        let db = fx.aggregator().aggregate().await.unwrap();
        let store = &db.stores["printed_parts"];
        assert_eq!(store.logo, "pp.svg");
        assert_eq!(store.ships_to, vec!["DE", "AT"]);
    }

    #[tokio::test]
    async fn test_store_and_brand_with_same_key_do_not_collide() {
        let fx = Fixture::new();
        fx.seed_color();
        let input = StoreInput {
            id: "Acme_3D".into(),
            name: "Acme shop".into(),
            storefront_url: "https://acme.example/shop".into(),
            ..Default::default()
        };
        fx.store_repo().create(input, None).await.unwrap();
        assert!(fx.stores_path("Acme_3D/store.json").exists());
        assert!(fx.data_path("Acme_3D/brand.json").exists());
    }

    #[tokio::test]
    async fn test_update_renames_store() {
        let fx = Fixture::new();
        fx.seed_color();
        let input = StoreInput {
            id: "amazon-de".into(),
            name: "Amazon DE".into(),
            storefront_url: "https://amazon.example/de".into(),
            storefront_affiliate_link: Some("https://amazon.example/de?tag=x".into()),
            ..Default::default()
        };
        let path = fx.store_repo().update("amazon", input, None).await.unwrap();
        assert_eq!(path, "amazon-de");
        assert!(!fx.stores_path("amazon").exists());

        let doc = fx.store_repo().load("amazon-de").await.unwrap();
        assert_eq!(doc.name, "Amazon DE");
        assert_eq!(doc.storefront_affiliate_link, "https://amazon.example/de?tag=x");
        assert!(doc.ships_from.is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_unknown_keys() {
        let fx = Fixture::new();
        fx.put_store(
            "amazon/store.json",
            r#"{"id":"amazon","name":"Amazon","storefront_url":"https://amazon.example","ships_from":["US"],"ships_to":["US"],"currency":"USD","priority":2}"#,
        );
        let input = StoreInput {
            id: "amazon".into(),
            name: "Amazon US".into(),
            storefront_url: "https://amazon.example".into(),
            ships_from: OneOrMany::One("US".into()),
            ..Default::default()
        };
        fx.store_repo().update("amazon", input, None).await.unwrap();

        let doc = fx.store_repo().load("amazon").await.unwrap();
        assert_eq!(doc.name, "Amazon US");
        assert_eq!(doc.extra.get("currency"), Some(&json!("USD")));
        assert_eq!(doc.extra.get("priority"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn test_create_duplicate_and_update_missing() {
        let fx = Fixture::new();
        let repo = fx.store_repo();
        repo.create(printed_parts(), None).await.unwrap();
        let err = repo.create(printed_parts(), None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyExists);

        let err = repo.update("ghost", printed_parts(), None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
