//! Retail stores: `<stores_root>/<store>/store.json`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::common::{OneOrMany, clean_text, one_or_many};

/// Contents of `store.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Store id; its slug names the directory.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub storefront_url: String,
    /// Affiliate storefront link, empty when none.
    #[serde(default)]
    pub storefront_affiliate_link: String,
    /// Logo file name inside the store directory.
    #[serde(default)]
    pub logo: String,
    /// Region codes the store ships from.
    #[serde(default, deserialize_with = "one_or_many")]
    pub ships_from: Vec<String>,
    /// Region codes the store ships to.
    #[serde(default, deserialize_with = "one_or_many")]
    pub ships_to: Vec<String>,
    /// Unrecognised keys, preserved across updates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A store as held in the aggregated database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub storefront_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storefront_affiliate_link: Option<String>,
    /// Logo file detected in the store directory, or empty.
    pub logo: String,
    pub ships_from: Vec<String>,
    pub ships_to: Vec<String>,
}

impl Store {
    /// Assemble the aggregated view, falling back to the directory name for
    /// a missing id or name.
    pub fn from_document(key: &str, doc: StoreDocument, logo: Option<String>) -> Self {
        let id = clean_text(Some(doc.id)).unwrap_or_else(|| key.to_string());
        let name = clean_text(Some(doc.name)).unwrap_or_else(|| key.to_string());
        Self {
            id,
            name,
            storefront_url: doc.storefront_url,
            storefront_affiliate_link: clean_text(Some(doc.storefront_affiliate_link)),
            logo: logo.unwrap_or_default(),
            ships_from: doc.ships_from,
            ships_to: doc.ships_to,
        }
    }
}

/// Validated store data submitted for create or update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct StoreInput {
    #[validate(length(min = 1, max = 255, message = "Id is required"))]
    pub id: String,
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(url(message = "Please enter a valid URL"))]
    pub storefront_url: String,
    #[serde(default, deserialize_with = "crate::common::empty_as_none")]
    #[validate(url(message = "Please enter a valid URL"))]
    pub storefront_affiliate_link: Option<String>,
    /// Existing logo file name to keep when no new logo is uploaded.
    #[serde(default, deserialize_with = "crate::common::empty_as_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub ships_from: OneOrMany<String>,
    #[serde(default)]
    pub ships_to: OneOrMany<String>,
}

impl StoreInput {
    /// Build the persisted document with the resolved logo file name,
    /// carrying over unknown keys from disk.
    pub fn into_document(self, logo: Option<String>, extra: Map<String, Value>) -> StoreDocument {
        StoreDocument {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            storefront_url: self.storefront_url.trim().to_string(),
            storefront_affiliate_link: clean_text(self.storefront_affiliate_link)
                .unwrap_or_default(),
            logo: logo.unwrap_or_default(),
            ships_from: regions(self.ships_from),
            ships_to: regions(self.ships_to),
            extra,
        }
    }
}

fn regions(codes: OneOrMany<String>) -> Vec<String> {
    codes
        .into_vec()
        .into_iter()
        .filter_map(|code| clean_text(Some(code)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_region_is_wrapped() {
        let input: StoreInput = serde_json::from_value(json!({
            "id": "printed_solid",
            "name": "Printed Solid",
            "storefront_url": "https://www.printedsolid.com",
            "ships_from": "US",
            "ships_to": ["US", "CA"]
        }))
        .unwrap();
        assert!(input.validate().is_ok());
        let doc = input.into_document(None, Map::new());
        assert_eq!(doc.ships_from, vec!["US"]);
        assert_eq!(doc.ships_to, vec!["US", "CA"]);
        assert_eq!(doc.storefront_affiliate_link, "");
    }

    #[test]
    fn test_document_reads_bare_region() {
        let doc: StoreDocument = serde_json::from_value(json!({
            "id": "3djake",
            "name": "3DJake",
            "ships_from": "AT"
        }))
        .unwrap();
        assert_eq!(doc.ships_from, vec!["AT"]);
        assert!(doc.ships_to.is_empty());
    }

    #[test]
    fn test_aggregated_store_drops_blank_affiliate_link() {
        let doc = StoreDocument {
            id: "amazon".into(),
            name: "Amazon".into(),
            ..Default::default()
        };
        let store = Store::from_document("amazon", doc, Some("logo.png".into()));
        assert!(store.storefront_affiliate_link.is_none());
        assert_eq!(store.logo, "logo.png");
    }
}
