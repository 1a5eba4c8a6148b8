//! One repository per level of the data tree.
//!
//! Each repository turns validated input into directories and JSON files:
//! `create` fails if the target directory exists, `update` locates the entity
//! by its current key, renames the directory when the identity changed, and
//! rewrites the level's files. Both return the resulting directory path
//! relative to the store root.

pub mod brand;
pub mod filament;
pub mod material;
pub mod store;
pub mod variant;

pub use brand::BrandRepository;
pub use filament::FilamentRepository;
pub use material::MaterialRepository;
pub use store::StoreRepository;
pub use variant::VariantRepository;

use serde::de::DeserializeOwned;

use spooldb_core::traits::{RecordStore, RecordStoreExt, join_path};
use spooldb_core::{AppError, AppResult, ErrorKind};
use spooldb_entity::LogoUpload;

/// Lock-table namespace for paths under the data root.
pub(crate) const DATA_LOCKS: &str = "data";
/// Lock-table namespace for paths under the store root.
pub(crate) const STORE_LOCKS: &str = "stores";

/// Lock key for a path in the given namespace.
pub(crate) fn lock_key(namespace: &str, path: &str) -> String {
    format!("{namespace}:{path}")
}

/// Fail with `NotFound` unless `dir` is an existing directory.
pub(crate) async fn require_dir(store: &dyn RecordStore, what: &str, dir: &str) -> AppResult<()> {
    if store.is_dir(dir).await? {
        Ok(())
    } else {
        Err(AppError::not_found(format!("{what} directory '{dir}' does not exist")))
    }
}

/// Create a new entity directory under an existing parent.
pub(crate) async fn create_entity_dir(
    store: &dyn RecordStore,
    what: &str,
    dir: &str,
) -> AppResult<()> {
    store.create_dir(dir).await.map_err(|e| match e.kind {
        ErrorKind::AlreadyExists => AppError::already_exists(format!("{what} '{dir}' already exists")),
        ErrorKind::NotFound => {
            AppError::not_found(format!("Cannot create {what} '{dir}': parent directory is missing"))
        }
        _ => AppError::new(e.kind, format!("Failed to create {what} '{dir}': {}", e.message)),
    })
}

/// Move an entity directory from `current` to `target` within `parent`.
///
/// Returns the resulting directory path; a no-op when the keys are equal.
pub(crate) async fn relocate(
    store: &dyn RecordStore,
    what: &str,
    parent: &str,
    current: &str,
    target: &str,
) -> AppResult<String> {
    let current_dir = join_path(&[parent, current]);
    require_dir(store, what, &current_dir).await?;
    if current == target {
        return Ok(current_dir);
    }

    let target_dir = join_path(&[parent, target]);
    store
        .rename_dir(&current_dir, &target_dir)
        .await
        .map_err(|e| match e.kind {
            ErrorKind::AlreadyExists => AppError::already_exists(format!(
                "Cannot rename {what} '{current_dir}' to '{target_dir}': target already exists"
            )),
            _ => AppError::new(
                e.kind,
                format!("Failed to rename {what} '{current_dir}' to '{target_dir}': {}", e.message),
            ),
        })?;
    Ok(target_dir)
}

/// Read an existing record, treating a missing file as the default value.
///
/// A file that exists but does not parse is an error.
pub(crate) async fn load_or_default<T>(store: &dyn RecordStore, path: &str) -> AppResult<T>
where
    T: DeserializeOwned + Default + Send,
{
    match store.read_json::<T>(path).await {
        Ok(record) => Ok(record),
        Err(e) if e.is(ErrorKind::NotFound) => Ok(T::default()),
        Err(e) => Err(e),
    }
}

/// Resolve the logo file name for a brand or store directory.
///
/// An upload is written next to the JSON file and wins; otherwise an
/// explicitly named existing file is kept, and failing that the first logo
/// image found in the directory.
pub(crate) async fn resolve_logo(
    store: &dyn RecordStore,
    dir: &str,
    upload: Option<LogoUpload>,
    keep: Option<String>,
) -> AppResult<Option<String>> {
    if let Some(upload) = upload {
        let name = upload.stored_name()?;
        store
            .write_bytes(&join_path(&[dir, &name]), upload.bytes)
            .await?;
        return Ok(Some(name));
    }
    if let Some(name) = keep {
        let name = name.rsplit('/').next().unwrap_or_default().to_string();
        if !name.is_empty() {
            return Ok(Some(name));
        }
    }
    store.find_logo(dir).await
}
