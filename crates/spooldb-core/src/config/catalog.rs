//! Catalog data location configuration.

use serde::{Deserialize, Serialize};

/// Where the brand and store trees live and how they may be changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Root of the brand → material → filament → color hierarchy.
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// Root of the flat store directory.
    #[serde(default = "default_stores_root")]
    pub stores_root: String,
    /// Reject every mutation when the data tree is not writable.
    #[serde(default)]
    pub read_only: bool,
    /// Maximum accepted logo upload size in bytes (default 5 MB).
    #[serde(default = "default_max_logo_bytes")]
    pub max_logo_bytes: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            stores_root: default_stores_root(),
            read_only: false,
            max_logo_bytes: default_max_logo_bytes(),
        }
    }
}

fn default_data_root() -> String {
    "./data".to_string()
}

fn default_stores_root() -> String {
    "./stores".to_string()
}

fn default_max_logo_bytes() -> u64 {
    5_242_880 // 5 MB
}
