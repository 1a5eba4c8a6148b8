//! # spooldb-storage
//!
//! Record store implementations for SpoolDB. The local provider keeps every
//! record as a pretty-printed JSON file under a root directory.

pub mod local;

pub use local::LocalRecordStore;
