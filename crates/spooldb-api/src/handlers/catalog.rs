//! Whole-catalog reads and the forced rebuild.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use crate::dto::response::{ApiResponse, SnapshotInfo};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/catalog
pub async fn get_catalog(State(state): State<AppState>) -> ApiResult<Response> {
    let snapshot = state.cache.get().await?;
    Ok(Json(ApiResponse::ok(&snapshot.database)).into_response())
}

/// POST /api/catalog/refresh
pub async fn refresh_catalog(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<SnapshotInfo>>> {
    let snapshot = state.cache.refresh().await?;
    Ok(Json(ApiResponse::ok(SnapshotInfo::from(snapshot.as_ref()))))
}

/// GET /api/catalog/info
pub async fn catalog_info(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<SnapshotInfo>>> {
    let snapshot = state.cache.get().await?;
    Ok(Json(ApiResponse::ok(SnapshotInfo::from(snapshot.as_ref()))))
}
