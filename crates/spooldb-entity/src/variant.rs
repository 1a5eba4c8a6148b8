//! Color level: `<filament>/<color>/variant.json` plus `sizes.json`.
//!
//! The descriptive fields and the size sequence live in two sibling files
//! that are written independently. Sizes are always persisted as an array.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use crate::common::{OneOrMany, clean_number, clean_text, js_number};

/// Contents of `variant.json`, also used unchanged in the aggregated view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Display name of the color.
    #[serde(default)]
    pub color_name: String,
    /// Hex color code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_hex: Option<String>,
    /// Sparse trait flags; an absent key means "not applicable", not `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traits: Option<BTreeMap<String, bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discontinued: Option<bool>,
    /// Unrecognised keys, preserved across updates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The persisted shape of a variant.
pub type VariantDocument = Variant;

/// A store offer for one size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseLink {
    /// Weak reference to a store id; not checked on write.
    #[serde(default)]
    pub store_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub affiliate: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One spool size of a color.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Net filament weight in grams; 0 when unknown.
    #[serde(default, deserialize_with = "number_or_zero", serialize_with = "js_number")]
    pub filament_weight: f64,
    /// Nominal diameter in millimetres; 0 when unknown.
    #[serde(default, deserialize_with = "number_or_zero", serialize_with = "js_number")]
    pub diameter: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ean: Option<String>,
    #[serde(default)]
    pub purchase_links: Vec<PurchaseLink>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(clean_number(Option::<f64>::deserialize(deserializer)?).unwrap_or(0.0))
}

/// A color as held in the aggregated database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Directory name.
    pub name: String,
    pub variant: Variant,
    pub sizes: Vec<Size>,
}

/// Validated purchase link submitted with a size.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PurchaseLinkInput {
    #[validate(length(min = 1, message = "Store id is required"))]
    pub store_id: String,
    #[validate(url(message = "Purchase link must be a valid URL"))]
    pub url: String,
    #[serde(default)]
    pub affiliate: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PurchaseLinkInput {
    fn into_link(self) -> PurchaseLink {
        PurchaseLink {
            store_id: self.store_id.trim().to_string(),
            url: self.url.trim().to_string(),
            affiliate: self.affiliate.unwrap_or(false),
            extra: self.extra,
        }
    }
}

/// Validated size submitted with a color.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SizeInput {
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub filament_weight: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub diameter: Option<f64>,
    #[serde(default, deserialize_with = "crate::common::empty_as_none")]
    pub ean: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub purchase_links: Vec<PurchaseLinkInput>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SizeInput {
    /// Build the persisted size; missing weight and diameter become 0.
    pub fn into_size(self) -> Size {
        Size {
            filament_weight: clean_number(self.filament_weight).unwrap_or(0.0),
            diameter: clean_number(self.diameter).unwrap_or(0.0),
            ean: clean_text(self.ean),
            purchase_links: self
                .purchase_links
                .into_iter()
                .map(PurchaseLinkInput::into_link)
                .collect(),
            extra: self.extra,
        }
    }
}

/// Validated color data submitted for create or update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct VariantInput {
    /// Display name; its slug names the directory.
    #[validate(length(min = 1, max = 255, message = "Color name is required"))]
    pub color_name: String,
    #[serde(default, deserialize_with = "crate::common::empty_as_none")]
    #[validate(custom(function = "validate_color_hex"))]
    pub color_hex: Option<String>,
    #[serde(default)]
    pub traits: Option<BTreeMap<String, bool>>,
    #[serde(default)]
    pub discontinued: Option<bool>,
    /// One size or a sequence of sizes.
    #[serde(default)]
    #[validate(custom(function = "validate_sizes"))]
    pub sizes: OneOrMany<SizeInput>,
}

impl VariantInput {
    /// Split into the two persisted files, carrying over unknown variant keys.
    pub fn into_parts(self, extra: Map<String, Value>) -> (Variant, Vec<Size>) {
        let traits = self.traits.filter(|t| !t.is_empty());
        let variant = Variant {
            color_name: self.color_name.trim().to_string(),
            color_hex: clean_text(self.color_hex),
            traits,
            discontinued: self.discontinued,
            extra,
        };
        let sizes = self
            .sizes
            .into_vec()
            .into_iter()
            .map(SizeInput::into_size)
            .collect();
        (variant, sizes)
    }
}

/// Accept `#rgb`, `#rrggbb` or `#rrggbbaa`, with or without the `#`.
fn validate_color_hex(value: &str) -> Result<(), ValidationError> {
    let digits = value.trim().trim_start_matches('#');
    let ok = matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit());
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("color_hex")
            .with_message(format!("'{value}' is not a hex color").into()))
    }
}

fn validate_sizes(sizes: &OneOrMany<SizeInput>) -> Result<(), ValidationError> {
    for (index, size) in sizes.iter().enumerate() {
        if let Err(errors) = size.validate() {
            return Err(ValidationError::new("sizes")
                .with_message(format!("size {index}: {errors}").into()));
        }
    }
    Ok(())
}
