//! The root aggregate assembled from the whole data tree.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::brand::Brand;
use crate::store::Store;
use crate::variant::Color;

/// Every brand and store, keyed by directory name.
///
/// Rebuilt wholesale by the aggregator; never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilamentDatabase {
    pub brands: BTreeMap<String, Brand>,
    pub stores: BTreeMap<String, Store>,
}

/// Entity counts per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub brands: usize,
    pub materials: usize,
    pub filaments: usize,
    pub colors: usize,
    pub sizes: usize,
    pub stores: usize,
}

impl FilamentDatabase {
    /// Look up a brand by directory key.
    pub fn brand(&self, key: &str) -> Option<&Brand> {
        self.brands.get(key)
    }

    /// Look up a store by directory key.
    pub fn store(&self, key: &str) -> Option<&Store> {
        self.stores.get(key)
    }

    /// Look up a color by its four directory keys.
    pub fn color(&self, brand: &str, material: &str, filament: &str, color: &str) -> Option<&Color> {
        self.brands
            .get(brand)?
            .materials
            .get(material)?
            .filaments
            .get(filament)?
            .colors
            .get(color)
    }

    /// Every color with its `brand/material/filament/color` path.
    pub fn colors(&self) -> impl Iterator<Item = (String, &Color)> {
        self.brands.iter().flat_map(|(b, brand)| {
            brand.materials.iter().flat_map(move |(m, material)| {
                material.filaments.iter().flat_map(move |(f, filament)| {
                    filament
                        .colors
                        .iter()
                        .map(move |(c, color)| (format!("{b}/{m}/{f}/{c}"), color))
                })
            })
        })
    }

    /// The set of store ids that purchase links may reference.
    pub fn store_ids(&self) -> BTreeSet<&str> {
        self.stores.values().map(|s| s.id.as_str()).collect()
    }

    /// Count entities at every level.
    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            brands: self.brands.len(),
            stores: self.stores.len(),
            ..Default::default()
        };
        for brand in self.brands.values() {
            stats.materials += brand.materials.len();
            for material in brand.materials.values() {
                stats.filaments += material.filaments.len();
                for filament in material.filaments.values() {
                    stats.colors += filament.colors.len();
                    stats.sizes += filament.colors.values().map(|c| c.sizes.len()).sum::<usize>();
                }
            }
        }
        stats
    }
}
