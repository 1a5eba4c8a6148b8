//! Per-path advisory locks for mutations.
//!
//! Two mutations of the same entity directory run one after the other;
//! mutations of different directories do not contend. A rename holds both
//! the old and the new path.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;

type LockTable = DashMap<String, Arc<Mutex<()>>>;

/// Guards held for the duration of one mutation.
///
/// Dropping it releases every path and removes table entries nobody else
/// is waiting on.
#[derive(Debug)]
pub struct PathGuard {
    table: Arc<LockTable>,
    held: Vec<(String, OwnedMutexGuard<()>)>,
}

impl Drop for PathGuard {
    fn drop(&mut self) {
        while let Some((path, guard)) = self.held.pop() {
            drop(guard);
            // Waiters hold a clone of the mutex, so only an idle entry has a
            // single reference left.
            self.table
                .remove_if(&path, |_, mutex| Arc::strong_count(mutex) == 1);
        }
    }
}

/// A map from canonical entity path to its mutex.
#[derive(Debug, Default)]
pub struct PathLocks {
    table: Arc<LockTable>,
}

impl PathLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, path: &str) -> Arc<Mutex<()>> {
        self.table
            .entry(path.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    /// Lock one path.
    pub async fn lock(&self, path: &str) -> PathGuard {
        self.lock_all(&[path]).await
    }

    /// Lock several paths in sorted order, skipping duplicates.
    pub async fn lock_all(&self, paths: &[&str]) -> PathGuard {
        let mut sorted: Vec<&str> = paths.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut guard = PathGuard {
            table: Arc::clone(&self.table),
            held: Vec::with_capacity(sorted.len()),
        };
        for path in sorted {
            let mutex = self.entry(path);
            let held = mutex.lock_owned().await;
            trace!(path, "Acquired path lock");
            guard.held.push((path.to_string(), held));
        }
        guard
    }

    /// Number of paths currently locked or waited on.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether no path is locked.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_path_is_serialized() {
        let locks = Arc::new(PathLocks::new());
        let guard = locks.lock("Acme_3D").await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _g = locks.lock("Acme_3D").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        assert_eq!(locks.len(), 1);

        drop(guard);
        contender.await.unwrap();
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_different_paths_do_not_contend() {
        let locks = PathLocks::new();
        let _a = locks.lock("Acme_3D").await;
        let _b = locks.lock("Other").await;
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_pair_lock_dedups() {
        let locks = PathLocks::new();
        let _g = locks.lock_all(&["b", "a", "b"]).await;
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_released_paths_are_pruned() {
        let locks = PathLocks::new();
        for i in 0..50 {
            let key = format!("brand-{i}");
            let _g = locks.lock_all(&[key.as_str(), "shared"]).await;
        }
        assert!(locks.is_empty());

        let held = locks.lock("Acme_3D").await;
        let again = locks.lock("Other").await;
        drop(held);
        assert_eq!(locks.len(), 1);
        drop(again);
        assert!(locks.is_empty());
    }
}
