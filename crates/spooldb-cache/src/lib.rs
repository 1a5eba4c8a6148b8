//! # spooldb-cache
//!
//! Process-wide cache of the assembled catalog. The whole database is one
//! entry: it is built on first access, replaced wholesale on refresh, and
//! never expires on its own.

pub mod database;
pub mod loader;
pub mod snapshot;

pub use database::DatabaseCache;
pub use loader::DatabaseLoader;
pub use snapshot::CatalogSnapshot;
