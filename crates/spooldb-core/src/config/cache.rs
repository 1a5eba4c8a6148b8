//! Database cache configuration.

use serde::{Deserialize, Serialize};

/// Settings for the in-memory catalog snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Build the snapshot before the server starts accepting requests.
    #[serde(default = "default_true")]
    pub prime_on_startup: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prime_on_startup: true,
        }
    }
}

fn default_true() -> bool {
    true
}
