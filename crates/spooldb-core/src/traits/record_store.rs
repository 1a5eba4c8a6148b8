//! Record store trait for the directory-tree database.

use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::result::AppResult;

/// Image extensions recognised as an entity logo (compared case-insensitively).
pub const LOGO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "svg", "webp"];

/// Low-level access to JSON records and logo files under one root directory.
///
/// All paths are relative to the store root and use `/` as separator. The
/// store knows nothing about brands or stores; the per-level repositories
/// decide which paths mean what, so a different backend can be swapped in
/// without touching the tree-walking logic.
#[async_trait]
pub trait RecordStore: Send + Sync + Debug + 'static {
    /// Human-readable location of the root, for logs and error messages.
    fn location(&self) -> String;

    /// Whether anything exists at `path`.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Whether `path` exists and is a directory.
    async fn is_dir(&self, path: &str) -> AppResult<bool>;

    /// Names of the immediate subdirectories of `path`, sorted.
    ///
    /// Fails with `NotFound` if `path` itself does not exist.
    async fn list_dirs(&self, path: &str) -> AppResult<Vec<String>>;

    /// Names of the regular files directly inside `path`, sorted.
    async fn list_files(&self, path: &str) -> AppResult<Vec<String>>;

    /// Read and parse a JSON file.
    ///
    /// `NotFound` if the file is absent, `Parse` if it is not valid JSON.
    async fn read_json_value(&self, path: &str) -> AppResult<serde_json::Value>;

    /// Write a JSON value in the canonical on-disk format, replacing any
    /// existing file atomically.
    async fn write_json_value(&self, path: &str, value: &serde_json::Value) -> AppResult<()>;

    /// Write raw bytes (logo uploads), creating parent directories.
    async fn write_bytes(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Create exactly one directory; `AlreadyExists` if it is present and
    /// `NotFound` if its parent is missing.
    async fn create_dir(&self, path: &str) -> AppResult<()>;

    /// Create a directory and any missing parents.
    async fn create_dir_all(&self, path: &str) -> AppResult<()>;

    /// Rename a directory; `AlreadyExists` if `to` is occupied, `NotFound`
    /// if `from` is missing.
    async fn rename_dir(&self, from: &str, to: &str) -> AppResult<()>;

    /// First file in `dir` (by sorted name) with a logo extension.
    async fn find_logo(&self, dir: &str) -> AppResult<Option<String>> {
        let files = self.list_files(dir).await?;
        Ok(files.into_iter().find(|name| is_logo_file(name)))
    }
}

/// Typed JSON helpers layered on top of [`RecordStore`].
#[async_trait]
pub trait RecordStoreExt: RecordStore {
    /// Read a JSON file into a typed record.
    async fn read_json<T: DeserializeOwned + Send>(&self, path: &str) -> AppResult<T> {
        let value = self.read_json_value(path).await?;
        serde_json::from_value(value).map_err(|e| {
            AppError::with_source(
                crate::error::ErrorKind::Parse,
                format!("Malformed record at {path}: {e}"),
                e,
            )
        })
    }

    /// Serialize a typed record and write it.
    async fn write_json<T: Serialize + Sync>(&self, path: &str, record: &T) -> AppResult<()> {
        let value = serde_json::to_value(record)?;
        self.write_json_value(path, &value).await
    }
}

impl<S: RecordStore + ?Sized> RecordStoreExt for S {}

/// Whether a file name carries one of the [`LOGO_EXTENSIONS`].
pub fn is_logo_file(name: &str) -> bool {
    if name.starts_with('.') {
        return false;
    }
    match name.rsplit_once('.') {
        Some((_, ext)) => LOGO_EXTENSIONS
            .iter()
            .any(|allowed| ext.eq_ignore_ascii_case(allowed)),
        None => false,
    }
}

/// Join relative path segments with `/`, skipping empty ones.
pub fn join_path(segments: &[&str]) -> String {
    segments
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}
