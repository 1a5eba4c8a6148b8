//! # spooldb-api
//!
//! HTTP API layer for SpoolDB built on Axum.
//!
//! Serves the cached catalog, applies mutations through the repositories
//! and refreshes the cache after each one. Provides the router, middleware
//! (CORS, compression, request logging), extractors, DTOs, and error
//! mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
