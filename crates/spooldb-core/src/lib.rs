//! # spooldb-core
//!
//! Core crate for SpoolDB. Contains the record-store trait, configuration
//! schemas, the directory slug rules, the JSON formatting contract shared by
//! every writer, and the unified error system.
//!
//! This crate has **no** internal dependencies on other SpoolDB crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
