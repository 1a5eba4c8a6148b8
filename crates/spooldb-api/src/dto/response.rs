//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use spooldb_cache::CatalogSnapshot;
use spooldb_entity::{Brand, CatalogStats};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Successful catalog builds since start.
    pub cache_generation: u64,
    /// Whether a snapshot is currently cached.
    pub cache_ready: bool,
    pub read_only: bool,
}

/// Metadata of the snapshot a response was served from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotInfo {
    pub generation: u64,
    pub built_at: DateTime<Utc>,
    pub build_millis: u64,
    pub stats: CatalogStats,
}

impl From<&CatalogSnapshot> for SnapshotInfo {
    fn from(snapshot: &CatalogSnapshot) -> Self {
        Self {
            generation: snapshot.generation,
            built_at: snapshot.built_at,
            build_millis: snapshot.build_millis,
            stats: snapshot.database.stats(),
        }
    }
}

/// Result of a create, update or delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    /// Directory of the affected entity, relative to its root.
    pub path: String,
    /// Generation of the snapshot rebuilt after the change.
    pub generation: u64,
}

/// One row of the brand listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandSummary {
    /// Directory key.
    pub key: String,
    pub brand: String,
    pub logo: String,
    pub website: String,
    pub origin: String,
    pub materials: usize,
    pub filaments: usize,
}

impl BrandSummary {
    pub fn new(key: &str, brand: &Brand) -> Self {
        Self {
            key: key.to_string(),
            brand: brand.brand.clone(),
            logo: brand.logo.clone(),
            website: brand.website.clone(),
            origin: brand.origin.clone(),
            materials: brand.materials.len(),
            filaments: brand.filament_count(),
        }
    }
}
