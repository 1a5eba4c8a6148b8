//! Material level: `<brand>/<material>/material.json`, including the
//! per-slicer default settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::common::{clean_number, clean_text, js_number_opt};
use crate::filament::Filament;

/// Temperatures shared by every slicer family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericSlicerSettings {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number_opt"
    )]
    pub first_layer_bed_temp: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number_opt"
    )]
    pub first_layer_nozzle_temp: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number_opt"
    )]
    pub bed_temp: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number_opt"
    )]
    pub nozzle_temp: Option<f64>,
}

impl GenericSlicerSettings {
    /// Drop meaningless values; `None` when nothing is left.
    pub fn normalized(self) -> Option<Self> {
        let cleaned = Self {
            first_layer_bed_temp: clean_number(self.first_layer_bed_temp),
            first_layer_nozzle_temp: clean_number(self.first_layer_nozzle_temp),
            bed_temp: clean_number(self.bed_temp),
            nozzle_temp: clean_number(self.nozzle_temp),
        };
        (cleaned != Self::default()).then_some(cleaned)
    }
}

/// Overrides for one named slicer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlicerProfile {
    /// Name of the slicer's built-in profile to start from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_name: Option<String>,
    /// Path to a profile file (Cura).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_path: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number_opt"
    )]
    pub first_layer_bed_temp: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number_opt"
    )]
    pub first_layer_nozzle_temp: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number_opt"
    )]
    pub bed_temp: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number_opt"
    )]
    pub nozzle_temp: Option<f64>,
}

impl SlicerProfile {
    /// Drop meaningless values; `None` when nothing is left.
    pub fn normalized(self) -> Option<Self> {
        let cleaned = Self {
            profile_name: clean_text(self.profile_name),
            profile_path: clean_text(self.profile_path),
            first_layer_bed_temp: clean_number(self.first_layer_bed_temp),
            first_layer_nozzle_temp: clean_number(self.first_layer_nozzle_temp),
            bed_temp: clean_number(self.bed_temp),
            nozzle_temp: clean_number(self.nozzle_temp),
        };
        (cleaned != Self::default()).then_some(cleaned)
    }
}

/// Default slicer settings of a material, one optional record per family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlicerSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic: Option<GenericSlicerSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prusaslicer: Option<SlicerProfile>,
    /// Bambu Studio, persisted as `bambus`.
    #[serde(
        default,
        rename = "bambus",
        alias = "bambustudio",
        skip_serializing_if = "Option::is_none"
    )]
    pub bambustudio: Option<SlicerProfile>,
    /// OrcaSlicer, persisted as `orca`.
    #[serde(
        default,
        rename = "orca",
        alias = "orcaslicer",
        skip_serializing_if = "Option::is_none"
    )]
    pub orcaslicer: Option<SlicerProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cura: Option<SlicerProfile>,
}

impl SlicerSettings {
    /// Normalize every sub-record and drop the whole record if all are empty.
    pub fn normalized(self) -> Option<Self> {
        let cleaned = Self {
            generic: self.generic.and_then(GenericSlicerSettings::normalized),
            prusaslicer: self.prusaslicer.and_then(SlicerProfile::normalized),
            bambustudio: self.bambustudio.and_then(SlicerProfile::normalized),
            orcaslicer: self.orcaslicer.and_then(SlicerProfile::normalized),
            cura: self.cura.and_then(SlicerProfile::normalized),
        };
        (cleaned != Self::default()).then_some(cleaned)
    }
}

/// Contents of `material.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialDocument {
    /// Display name.
    #[serde(default)]
    pub material: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number_opt"
    )]
    pub default_max_dry_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_slicer_settings: Option<SlicerSettings>,
    /// Unrecognised keys, preserved across updates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A material as held in the aggregated database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Display name from `material.json`.
    pub material: String,
    /// Directory name.
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "js_number_opt"
    )]
    pub default_max_dry_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_slicer_settings: Option<SlicerSettings>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Filaments keyed by directory name.
    pub filaments: BTreeMap<String, Filament>,
}

impl Material {
    /// Assemble the aggregated view from a document and its children.
    pub fn from_document(
        key: &str,
        doc: MaterialDocument,
        filaments: BTreeMap<String, Filament>,
    ) -> Self {
        let material = if doc.material.trim().is_empty() {
            key.to_string()
        } else {
            doc.material
        };
        let mut extra = doc.extra;
        extra.remove("name");
        extra.remove("filaments");
        Self {
            material,
            name: key.to_string(),
            default_max_dry_temperature: doc.default_max_dry_temperature,
            default_slicer_settings: doc.default_slicer_settings,
            extra,
            filaments,
        }
    }
}

/// Validated material data submitted for create or update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MaterialInput {
    /// Display name; its slug names the directory.
    #[validate(length(min = 1, max = 255, message = "Material name is required"))]
    pub material: String,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 300.0))]
    pub default_max_dry_temperature: Option<f64>,
    #[serde(default)]
    pub default_slicer_settings: Option<SlicerSettings>,
}

impl MaterialInput {
    /// Build the persisted document, carrying over unknown keys from disk.
    pub fn into_document(self, extra: Map<String, Value>) -> MaterialDocument {
        MaterialDocument {
            material: self.material.trim().to_string(),
            default_max_dry_temperature: clean_number(self.default_max_dry_temperature),
            default_slicer_settings: self
                .default_slicer_settings
                .and_then(SlicerSettings::normalized),
            extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_settings_are_dropped() {
        let input = MaterialInput {
            material: "PLA".into(),
            default_max_dry_temperature: Some(f64::NAN),
            default_slicer_settings: Some(SlicerSettings {
                generic: Some(GenericSlicerSettings::default()),
                prusaslicer: Some(SlicerProfile {
                    profile_name: Some("  ".into()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
        };
        let doc = input.into_document(Map::new());
        assert_eq!(serde_json::to_value(&doc).unwrap(), json!({ "material": "PLA" }));
    }

    #[test]
    fn test_partial_settings_keep_only_meaningful_values() {
        let input = MaterialInput {
            material: "PETG".into(),
            default_max_dry_temperature: Some(65.0),
            default_slicer_settings: Some(SlicerSettings {
                generic: Some(GenericSlicerSettings {
                    nozzle_temp: Some(240.0),
                    ..Default::default()
                }),
                cura: Some(SlicerProfile {
                    profile_path: Some("generic_petg".into()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
        };
        let doc = input.into_document(Map::new());
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "material": "PETG",
                "default_max_dry_temperature": 65,
                "default_slicer_settings": {
                    "generic": { "nozzle_temp": 240 },
                    "cura": { "profile_path": "generic_petg" }
                }
            })
        );
    }

    #[test]
    fn test_slicer_keys_are_written_as_bambus_and_orca() {
        let settings: SlicerSettings = serde_json::from_value(json!({
            "bambus": { "bed_temp": 60 },
            "orca": { "profile_name": "Generic PLA" }
        }))
        .unwrap();
        assert_eq!(settings.bambustudio.as_ref().unwrap().bed_temp, Some(60.0));
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({
                "bambus": { "bed_temp": 60 },
                "orca": { "profile_name": "Generic PLA" }
            })
        );

        let long_names: SlicerSettings = serde_json::from_value(json!({
            "bambustudio": { "nozzle_temp": 220 },
            "orcaslicer": { "nozzle_temp": 210 }
        }))
        .unwrap();
        let written = serde_json::to_value(&long_names).unwrap();
        assert_eq!(written["bambus"]["nozzle_temp"], json!(220));
        assert_eq!(written["orca"]["nozzle_temp"], json!(210));
        assert!(written.get("bambustudio").is_none());
    }

    #[test]
    fn test_unknown_keys_survive() {
        let doc: MaterialDocument =
            serde_json::from_value(json!({ "material": "ASA", "abrasive": false })).unwrap();
        assert_eq!(doc.extra.get("abrasive"), Some(&json!(false)));
        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["abrasive"], json!(false));
    }
}
