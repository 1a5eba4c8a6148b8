//! Brand level: `<data_root>/<brand>/brand.json`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::common::clean_text;
use crate::material::Material;

/// Contents of `brand.json`.
///
/// Every field is always written, absent values as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandDocument {
    /// Display name.
    #[serde(default)]
    pub brand: String,
    /// Brand website.
    #[serde(default)]
    pub website: String,
    /// Logo file name inside the brand directory.
    #[serde(default)]
    pub logo: String,
    /// Country or region of origin.
    #[serde(default)]
    pub origin: String,
}

/// A brand as held in the aggregated database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    /// Display name (falls back to the directory name).
    pub brand: String,
    /// Logo file detected in the brand directory, or empty.
    pub logo: String,
    /// Brand website, or empty.
    pub website: String,
    /// Origin, or empty.
    pub origin: String,
    /// Materials keyed by directory name.
    pub materials: BTreeMap<String, Material>,
}

impl Brand {
    /// Assemble the aggregated view from a document and its children.
    pub fn from_document(
        key: &str,
        doc: BrandDocument,
        logo: Option<String>,
        materials: BTreeMap<String, Material>,
    ) -> Self {
        let brand = if doc.brand.trim().is_empty() {
            key.to_string()
        } else {
            doc.brand
        };
        Self {
            brand,
            logo: logo.unwrap_or_default(),
            website: doc.website,
            origin: doc.origin,
            materials,
        }
    }

    /// Total number of filaments across all materials.
    pub fn filament_count(&self) -> usize {
        self.materials.values().map(|m| m.filaments.len()).sum()
    }
}

/// Validated brand data submitted for create or update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BrandInput {
    /// Display name; its slug names the directory.
    #[validate(length(min = 1, max = 255, message = "Brand name is required"))]
    pub brand: String,
    /// Brand website.
    #[serde(default, deserialize_with = "crate::common::empty_as_none")]
    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,
    /// Origin.
    #[serde(default, deserialize_with = "crate::common::empty_as_none")]
    pub origin: Option<String>,
    /// Existing logo file name to keep when no new logo is uploaded.
    #[serde(default, deserialize_with = "crate::common::empty_as_none")]
    pub logo: Option<String>,
}

impl BrandInput {
    /// Build the persisted document with the resolved logo file name.
    pub fn into_document(self, logo: Option<String>) -> BrandDocument {
        BrandDocument {
            brand: self.brand.trim().to_string(),
            website: clean_text(self.website).unwrap_or_default(),
            logo: logo.unwrap_or_default(),
            origin: clean_text(self.origin).unwrap_or_default(),
        }
    }
}
