//! `Writable` extractor: rejects mutations while the catalog is read-only.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use spooldb_core::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Proof that the catalog accepts mutations. Take it as a handler argument
/// on every mutating route.
#[derive(Debug, Clone, Copy)]
pub struct Writable;

impl FromRequestParts<AppState> for Writable {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.config.catalog.read_only {
            tracing::warn!(
                method = %parts.method,
                path = %parts.uri.path(),
                "Rejected mutation in read-only mode"
            );
            return Err(
                AppError::forbidden("The catalog is read-only; mutations are disabled").into(),
            );
        }
        Ok(Writable)
    }
}
