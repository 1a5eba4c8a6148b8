//! Core traits defined in `spooldb-core` and implemented by other crates.

pub mod record_store;

pub use record_store::{LOGO_EXTENSIONS, RecordStore, RecordStoreExt, is_logo_file, join_path};
