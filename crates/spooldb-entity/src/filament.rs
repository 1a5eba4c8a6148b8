//! Filament level: `<brand>/<material>/<filament>/filament.json`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::common::{clean_number, clean_text, js_number_opt};
use crate::variant::Color;

/// Contents of `filament.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilamentDocument {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Diameter tolerance in millimetres.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number_opt"
    )]
    pub diameter_tolerance: Option<f64>,
    /// Density in g/cm³.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number_opt"
    )]
    pub density: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number_opt"
    )]
    pub max_dry_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_sheet_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_sheet_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discontinued: Option<bool>,
    /// Unrecognised keys, preserved across updates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A filament as held in the aggregated database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filament {
    /// Display name (falls back to the directory name).
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number_opt"
    )]
    pub diameter_tolerance: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number_opt"
    )]
    pub density: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number_opt"
    )]
    pub max_dry_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_sheet_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_sheet_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discontinued: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Colors keyed by directory name.
    pub colors: BTreeMap<String, Color>,
}

impl Filament {
    /// Assemble the aggregated view from a document and its children.
    pub fn from_document(key: &str, doc: FilamentDocument, colors: BTreeMap<String, Color>) -> Self {
        let name = if doc.name.trim().is_empty() {
            key.to_string()
        } else {
            doc.name
        };
        let mut extra = doc.extra;
        extra.remove("colors");
        Self {
            name,
            diameter_tolerance: doc.diameter_tolerance,
            density: doc.density,
            max_dry_temperature: doc.max_dry_temperature,
            data_sheet_url: doc.data_sheet_url,
            safety_sheet_url: doc.safety_sheet_url,
            discontinued: doc.discontinued,
            extra,
            colors,
        }
    }

    /// Whether the filament is marked discontinued.
    pub fn is_discontinued(&self) -> bool {
        self.discontinued.unwrap_or(false)
    }
}

/// Validated filament data submitted for create or update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FilamentInput {
    /// Display name; its slug names the directory.
    #[validate(length(min = 1, max = 255, message = "Filament name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0))]
    pub diameter_tolerance: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 10.0))]
    pub density: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 300.0))]
    pub max_dry_temperature: Option<f64>,
    #[serde(default, deserialize_with = "crate::common::empty_as_none")]
    #[validate(url(message = "Data sheet must be a valid URL"))]
    pub data_sheet_url: Option<String>,
    #[serde(default, deserialize_with = "crate::common::empty_as_none")]
    #[validate(url(message = "Safety sheet must be a valid URL"))]
    pub safety_sheet_url: Option<String>,
    #[serde(default)]
    pub discontinued: Option<bool>,
}

impl FilamentInput {
    /// Build the persisted document, carrying over unknown keys from disk.
    pub fn into_document(self, extra: Map<String, Value>) -> FilamentDocument {
        FilamentDocument {
            name: self.name.trim().to_string(),
            diameter_tolerance: clean_number(self.diameter_tolerance),
            density: clean_number(self.density),
            max_dry_temperature: clean_number(self.max_dry_temperature),
            data_sheet_url: clean_text(self.data_sheet_url),
            safety_sheet_url: clean_text(self.safety_sheet_url),
            discontinued: self.discontinued,
            extra,
        }
    }
}
