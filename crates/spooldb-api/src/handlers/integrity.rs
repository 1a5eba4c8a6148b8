//! Integrity report over the raw trees.

use axum::Json;
use axum::extract::{Query, State};

use spooldb_service::IntegrityReport;

use crate::dto::request::IntegrityQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/integrity?markers=&folder_names=&store_ids=
pub async fn check_integrity(
    State(state): State<AppState>,
    Query(query): Query<IntegrityQuery>,
) -> ApiResult<Json<ApiResponse<IntegrityReport>>> {
    let report = state.integrity.check(query.into_checks()).await?;
    Ok(Json(ApiResponse::ok(report)))
}
