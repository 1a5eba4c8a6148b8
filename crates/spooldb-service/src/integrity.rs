//! Consistency checks over the raw data and store trees.
//!
//! Unlike the aggregator, the checker never aborts on a bad file: every
//! problem becomes an [`IntegrityIssue`] and the walk continues. A directory
//! missing its marker file is reported and not descended into.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use spooldb_core::traits::{RecordStore, join_path};
use spooldb_core::types::strip_illegal_chars;
use spooldb_core::{AppResult, ErrorKind};

use crate::layout::{
    BRAND_FILE, FILAMENT_FILE, MATERIAL_FILE, SIZES_FILE, STORE_FILE, VARIANT_FILE,
};

/// Category of an [`IntegrityIssue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A directory lacks the marker file of its level.
    MissingMarker,
    /// A directory name differs from the slug of its identity field.
    FolderNameMismatch,
    /// A purchase link names a store id that no store carries.
    UnknownStoreReference,
    /// A marker file is not valid JSON.
    InvalidJson,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::MissingMarker => "missing_marker",
            Self::FolderNameMismatch => "folder_name_mismatch",
            Self::UnknownStoreReference => "unknown_store_reference",
            Self::InvalidJson => "invalid_json",
        };
        f.write_str(label)
    }
}

/// One problem found by the checker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrityIssue {
    /// File or directory the issue refers to, prefixed with its root.
    pub path: String,
    pub kind: IssueKind,
    pub message: String,
}

/// Result of a full check.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrityReport {
    /// Directories examined across both trees.
    pub checked: usize,
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of issues of one kind.
    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }
}

/// Selects which groups of checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntegrityChecks {
    /// Marker presence and JSON validity.
    pub markers: bool,
    /// Directory names against identity fields.
    pub folder_names: bool,
    /// Purchase-link store ids against the store tree.
    pub store_ids: bool,
}

impl Default for IntegrityChecks {
    fn default() -> Self {
        Self {
            markers: true,
            folder_names: true,
            store_ids: true,
        }
    }
}

impl IntegrityChecks {
    /// Run only the groups that are switched on; none switched on means all.
    pub fn select(markers: bool, folder_names: bool, store_ids: bool) -> Self {
        if !(markers || folder_names || store_ids) {
            return Self::default();
        }
        Self {
            markers,
            folder_names,
            store_ids,
        }
    }
}

/// One level of a tree: what it is called, which files mark it, and which
/// field of the first marker names its directory.
struct Level {
    what: &'static str,
    markers: &'static [&'static str],
    identity: &'static str,
}

const DATA_LEVELS: [Level; 4] = [
    Level {
        what: "Brand",
        markers: &[BRAND_FILE],
        identity: "brand",
    },
    Level {
        what: "Material",
        markers: &[MATERIAL_FILE],
        identity: "material",
    },
    Level {
        what: "Filament",
        markers: &[FILAMENT_FILE],
        identity: "name",
    },
    Level {
        what: "Color",
        markers: &[VARIANT_FILE, SIZES_FILE],
        identity: "color_name",
    },
];

const STORE_LEVEL: Level = Level {
    what: "Store",
    markers: &[STORE_FILE],
    identity: "id",
};

/// Marker contents of one directory that passed the marker checks.
struct Inspected {
    path: String,
    documents: Vec<Value>,
}

/// Walks both trees and reports inconsistencies.
#[derive(Debug, Clone)]
pub struct IntegrityChecker {
    data: Arc<dyn RecordStore>,
    stores: Arc<dyn RecordStore>,
}

impl IntegrityChecker {
    pub fn new(data: Arc<dyn RecordStore>, stores: Arc<dyn RecordStore>) -> Self {
        Self { data, stores }
    }

    /// Run the selected checks.
    ///
    /// Only failures to list or read the trees themselves are errors.
    pub async fn check(&self, checks: IntegrityChecks) -> AppResult<IntegrityReport> {
        let mut report = IntegrityReport::default();

        let stores = self
            .walk(self.stores.as_ref(), &[STORE_LEVEL], checks, &mut report)
            .await?;
        let store_ids: BTreeSet<String> = stores
            .iter()
            .filter_map(|s| s.documents.first())
            .filter_map(|doc| doc.get("id").and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        let colors = self
            .walk(self.data.as_ref(), &DATA_LEVELS, checks, &mut report)
            .await?;
        if checks.store_ids {
            let location = self.data.location();
            for color in &colors {
                if let Some(sizes) = color.documents.get(1) {
                    let path = display_path(&location, &join_path(&[&color.path, SIZES_FILE]));
                    check_store_refs(&path, sizes, &store_ids, &mut report);
                }
            }
        }

        info!(
            checked = report.checked,
            issues = report.issues.len(),
            "Integrity check finished"
        );
        Ok(report)
    }

    /// Walk `levels` top-down and return the directories of the last level
    /// whose markers were all readable.
    async fn walk(
        &self,
        store: &dyn RecordStore,
        levels: &[Level],
        checks: IntegrityChecks,
        report: &mut IntegrityReport,
    ) -> AppResult<Vec<Inspected>> {
        let location = store.location();
        let mut frontier = vec![String::new()];
        let mut leaves = Vec::new();

        for (depth, level) in levels.iter().enumerate() {
            let last = depth + 1 == levels.len();
            let mut next = Vec::new();
            for parent in &frontier {
                for name in store.list_dirs(parent).await? {
                    let path = join_path(&[parent, &name]);
                    report.checked += 1;
                    let Some(inspected) =
                        inspect(store, &location, level, &name, path, checks, report).await?
                    else {
                        continue;
                    };
                    if last {
                        leaves.push(inspected);
                    } else {
                        next.push(inspected.path);
                    }
                }
            }
            frontier = next;
        }
        Ok(leaves)
    }
}

/// Check one directory's markers and name. Returns `None` when a marker is
/// missing or unreadable.
async fn inspect(
    store: &dyn RecordStore,
    location: &str,
    level: &Level,
    name: &str,
    path: String,
    checks: IntegrityChecks,
    report: &mut IntegrityReport,
) -> AppResult<Option<Inspected>> {
    let mut documents = Vec::with_capacity(level.markers.len());
    for marker in level.markers {
        let file = join_path(&[&path, marker]);
        match store.read_json_value(&file).await {
            Ok(value) => documents.push(value),
            Err(e) if e.is(ErrorKind::NotFound) => {
                if checks.markers {
                    report.issues.push(IntegrityIssue {
                        path: display_path(location, &path),
                        kind: IssueKind::MissingMarker,
                        message: format!("{} directory has no {marker}", level.what),
                    });
                }
                debug!(path = %path, marker, "Missing marker file");
                return Ok(None);
            }
            Err(e) if e.is(ErrorKind::Parse) => {
                if checks.markers {
                    report.issues.push(IntegrityIssue {
                        path: display_path(location, &file),
                        kind: IssueKind::InvalidJson,
                        message: e.message,
                    });
                }
                return Ok(None);
            }
            Err(e) => return Err(e),
        }
    }

    if checks.folder_names {
        let identity = documents
            .first()
            .and_then(|doc| doc.get(level.identity))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let expected = strip_illegal_chars(identity);
        if expected != name {
            report.issues.push(IntegrityIssue {
                path: display_path(location, &path),
                kind: IssueKind::FolderNameMismatch,
                message: format!(
                    "{} '{identity}' should live in '{expected}', found '{name}'",
                    level.what
                ),
            });
        }
    }

    Ok(Some(Inspected { path, documents }))
}

/// Report every purchase link in `sizes` whose store id is unknown.
fn check_store_refs(
    path: &str,
    sizes: &Value,
    store_ids: &BTreeSet<String>,
    report: &mut IntegrityReport,
) {
    let Some(sizes) = sizes.as_array() else {
        return;
    };
    for (size_idx, size) in sizes.iter().enumerate() {
        let links = size.get("purchase_links").and_then(Value::as_array);
        for (link_idx, link) in links.into_iter().flatten().enumerate() {
            let Some(store_id) = link.get("store_id").and_then(Value::as_str) else {
                continue;
            };
            if !store_ids.contains(store_id) {
                report.issues.push(IntegrityIssue {
                    path: path.to_string(),
                    kind: IssueKind::UnknownStoreReference,
                    message: format!(
                        "'{store_id}' is not a valid store ID (at $[{size_idx}].purchase_links[{link_idx}])"
                    ),
                });
            }
        }
    }
}

fn display_path(location: &str, path: &str) -> String {
    format!("{}/{}", location.trim_end_matches('/'), path)
}
