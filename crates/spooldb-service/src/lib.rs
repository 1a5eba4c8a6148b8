//! # spooldb-service
//!
//! The catalog's working parts on top of a [`RecordStore`]:
//!
//! - [`CatalogAggregator`] walks the brand and store trees into one
//!   [`FilamentDatabase`](spooldb_entity::FilamentDatabase) and feeds the
//!   cache,
//! - one repository per level applies validated input to the tree,
//! - [`IntegrityChecker`] reports inconsistencies between folder names,
//!   marker files, and store references.
//!
//! Repositories never touch the cache; callers refresh it after a successful
//! mutation.
//!
//! [`RecordStore`]: spooldb_core::traits::RecordStore

pub mod aggregator;
pub mod integrity;
pub mod layout;
pub mod locks;
pub mod repository;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregator::CatalogAggregator;
pub use integrity::{
    IntegrityChecker, IntegrityChecks, IntegrityIssue, IntegrityReport, IssueKind,
};
pub use locks::PathLocks;
pub use repository::{
    BrandRepository, FilamentRepository, MaterialRepository, StoreRepository, VariantRepository,
};
