//! Request DTOs.
//!
//! Entity inputs are the validated records from `spooldb-entity`; this
//! module only holds query parameters.

use serde::{Deserialize, Serialize};

use spooldb_service::IntegrityChecks;

/// `GET /api/integrity` query. Naming no group runs all of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrityQuery {
    #[serde(default)]
    pub markers: bool,
    #[serde(default)]
    pub folder_names: bool,
    #[serde(default)]
    pub store_ids: bool,
}

impl IntegrityQuery {
    pub fn into_checks(self) -> IntegrityChecks {
        IntegrityChecks::select(self.markers, self.folder_names, self.store_ids)
    }
}
