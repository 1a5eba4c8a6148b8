//! Local filesystem record store.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use spooldb_core::error::{AppError, ErrorKind};
use spooldb_core::result::AppResult;
use spooldb_core::traits::RecordStore;
use spooldb_core::types::to_pretty_json;

/// Record store backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalRecordStore {
    /// Root directory of the tree.
    root: PathBuf,
}

impl LocalRecordStore {
    /// Create a store rooted at the given path. The root is not touched.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root directory if it does not exist yet.
    pub async fn ensure_root(&self) -> AppResult<()> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::io(
                format!("Failed to create record root: {}", self.root.display()),
                e,
            )
        })
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path inside the root.
    ///
    /// Absolute paths and `.`/`..` segments are rejected so that no path can
    /// leave the root.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let relative = Path::new(path);
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                _ => {
                    return Err(AppError::validation(format!(
                        "Invalid record path '{path}'"
                    )));
                }
            }
        }
        Ok(self.root.join(relative))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::io(
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Write `data` to a sibling temp file, then rename it over `full_path`.
    async fn write_atomic(&self, path: &str, full_path: &Path, data: &[u8]) -> AppResult<()> {
        self.ensure_parent(full_path).await?;

        let file_name = full_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let temp_path = full_path.with_file_name(format!(
            ".{file_name}.{}.tmp",
            uuid::Uuid::new_v4().simple()
        ));

        fs::write(&temp_path, data)
            .await
            .map_err(|e| AppError::io(format!("Failed to write temp file for {path}"), e))?;

        if let Err(e) = fs::rename(&temp_path, full_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(AppError::io(format!("Failed to replace {path}"), e));
        }
        Ok(())
    }

    /// Names of the directories (or regular files) directly inside `path`, sorted.
    async fn list_entries(&self, path: &str, want_dirs: bool) -> AppResult<Vec<String>> {
        let full_path = self.resolve(path)?;
        let mut dir = fs::read_dir(&full_path)
            .await
            .map_err(|e| AppError::io(format!("Failed to list directory '{path}'"), e))?;

        let mut names = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| AppError::io(format!("Failed to read entry in '{path}'"), e))?
        {
            // Follows symlinks so a linked brand directory still counts.
            let meta = match fs::metadata(entry.path()).await {
                Ok(meta) => meta,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(AppError::io(
                        format!("Failed to stat entry in '{path}'"),
                        e,
                    ));
                }
            };
            let matches = if want_dirs { meta.is_dir() } else { meta.is_file() };
            if matches {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl RecordStore for LocalRecordStore {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        fs::try_exists(&full_path)
            .await
            .map_err(|e| AppError::io(format!("Failed to check '{path}'"), e))
    }

    async fn is_dir(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        match fs::metadata(&full_path).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::io(format!("Failed to stat '{path}'"), e)),
        }
    }

    async fn list_dirs(&self, path: &str) -> AppResult<Vec<String>> {
        self.list_entries(path, true).await
    }

    async fn list_files(&self, path: &str) -> AppResult<Vec<String>> {
        self.list_entries(path, false).await
    }

    async fn read_json_value(&self, path: &str) -> AppResult<serde_json::Value> {
        let full_path = self.resolve(path)?;
        let data = fs::read(&full_path)
            .await
            .map_err(|e| AppError::io(format!("Failed to read '{path}'"), e))?;
        serde_json::from_slice(&data).map_err(|e| {
            AppError::with_source(ErrorKind::Parse, format!("Malformed JSON in '{path}': {e}"), e)
        })
    }

    async fn write_json_value(&self, path: &str, value: &serde_json::Value) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        let data = to_pretty_json(value)?;
        self.write_atomic(path, &full_path, &data).await?;
        debug!(path, bytes = data.len(), "Wrote record");
        Ok(())
    }

    async fn write_bytes(&self, path: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        self.write_atomic(path, &full_path, &data).await?;
        debug!(path, bytes = data.len(), "Wrote file");
        Ok(())
    }

    async fn create_dir(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        fs::create_dir(&full_path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => {
                AppError::already_exists(format!("Directory '{path}' already exists"))
            }
            std::io::ErrorKind::NotFound => {
                AppError::not_found(format!("Parent directory of '{path}' does not exist"))
            }
            _ => AppError::io(format!("Failed to create directory '{path}'"), e),
        })?;
        debug!(path, "Created directory");
        Ok(())
    }

    async fn create_dir_all(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        fs::create_dir_all(&full_path)
            .await
            .map_err(|e| AppError::io(format!("Failed to create directory '{path}'"), e))
    }

    async fn rename_dir(&self, from: &str, to: &str) -> AppResult<()> {
        let from_path = self.resolve(from)?;
        let to_path = self.resolve(to)?;

        if !self.is_dir(from).await? {
            return Err(AppError::not_found(format!(
                "Cannot rename '{from}': directory does not exist"
            )));
        }
        if self.exists(to).await? {
            return Err(AppError::already_exists(format!(
                "Cannot rename '{from}' to '{to}': target already exists"
            )));
        }

        fs::rename(&from_path, &to_path)
            .await
            .map_err(|e| AppError::io(format!("Failed to rename '{from}' -> '{to}'"), e))?;
        debug!(from, to, "Renamed directory");
        Ok(())
    }
}
