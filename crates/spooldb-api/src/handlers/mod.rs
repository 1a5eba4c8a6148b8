//! Route handlers organized by catalog level.

pub mod brand;
pub mod catalog;
pub mod color;
pub mod filament;
pub mod health;
pub mod integrity;
pub mod material;
pub mod store;

use spooldb_core::AppResult;

use crate::dto::response::MutationResponse;
use crate::state::AppState;

/// Rebuild the cache after a successful mutation of `path`.
///
/// A failed rebuild is returned to the client even though the change is
/// already on disk; the previous snapshot keeps serving reads.
pub(crate) async fn commit(state: &AppState, path: String) -> AppResult<MutationResponse> {
    let snapshot = state.cache.refresh().await?;
    Ok(MutationResponse {
        path,
        generation: snapshot.generation,
    })
}
