//! Print the brand hierarchy down to colors.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use spooldb_core::AppError;
use spooldb_core::config::AppConfig;
use spooldb_core::types::strip_illegal_chars;
use spooldb_entity::FilamentDatabase;
use spooldb_service::CatalogAggregator;

use crate::output::{self, OutputFormat};

/// Arguments for the tree command
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Only this brand (display name or directory key)
    #[arg(short, long)]
    pub brand: Option<String>,
}

/// One color per row
#[derive(Debug, Serialize, Tabled)]
struct ColorRow {
    brand: String,
    material: String,
    filament: String,
    color: String,
    hex: String,
    sizes: usize,
}

fn color_rows(db: &FilamentDatabase, brand: Option<&str>) -> Vec<ColorRow> {
    let wanted = brand.map(strip_illegal_chars);
    let mut rows = Vec::new();
    for (brand_key, brand) in &db.brands {
        if wanted.as_deref().is_some_and(|w| w != brand_key) {
            continue;
        }
        for material in brand.materials.values() {
            for filament in material.filaments.values() {
                for color in filament.colors.values() {
                    rows.push(ColorRow {
                        brand: brand.brand.clone(),
                        material: material.material.clone(),
                        filament: filament.name.clone(),
                        color: color.variant.color_name.clone(),
                        hex: color.variant.color_hex.clone().unwrap_or_default(),
                        sizes: color.sizes.len(),
                    });
                }
            }
        }
    }
    rows
}

/// Execute the tree command
pub async fn execute(
    args: &TreeArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let (data, stores) = super::open_roots(config);
    let db = CatalogAggregator::new(data, stores).aggregate().await?;
    debug!(brands = db.brands.len(), "Catalog aggregated");

    output::print_list(&color_rows(&db, args.brand.as_deref()), format);
    if format == OutputFormat::Table {
        let stats = db.stats();
        println!(
            "{} brands, {} materials, {} filaments, {} colors, {} sizes",
            stats.brands, stats.materials, stats.filaments, stats.colors, stats.sizes
        );
    }
    Ok(())
}
