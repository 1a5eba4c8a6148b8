//! List stores.

use serde::Serialize;
use tabled::Tabled;

use spooldb_core::AppError;
use spooldb_core::config::AppConfig;
use spooldb_entity::Store;
use spooldb_service::CatalogAggregator;

use crate::output::{self, OutputFormat, join_cell};

/// Store display row
#[derive(Debug, Serialize, Tabled)]
struct StoreRow {
    id: String,
    name: String,
    storefront: String,
    ships_from: String,
    ships_to: String,
}

impl From<&Store> for StoreRow {
    fn from(store: &Store) -> Self {
        Self {
            id: store.id.clone(),
            name: store.name.clone(),
            storefront: store.storefront_url.clone(),
            ships_from: join_cell(&store.ships_from),
            ships_to: join_cell(&store.ships_to),
        }
    }
}

/// Execute the stores command
pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let (data, stores) = super::open_roots(config);
    let db = CatalogAggregator::new(data, stores).aggregate().await?;

    let rows: Vec<StoreRow> = db.stores.values().map(StoreRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}
