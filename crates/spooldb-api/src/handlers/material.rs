//! Material create/update.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use spooldb_entity::MaterialInput;

use super::commit;
use crate::dto::response::{ApiResponse, MutationResponse};
use crate::error::ApiResult;
use crate::extractors::{ValidatedJson, Writable};
use crate::state::AppState;

/// POST /api/brands/{brand}/materials
pub async fn create_material(
    State(state): State<AppState>,
    _writable: Writable,
    Path(brand): Path<String>,
    ValidatedJson(input): ValidatedJson<MaterialInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<MutationResponse>>)> {
    let path = state.materials.create(&brand, input).await?;
    let result = commit(&state, path).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(result))))
}

/// PUT /api/brands/{brand}/materials/{material}
pub async fn update_material(
    State(state): State<AppState>,
    _writable: Writable,
    Path((brand, material)): Path<(String, String)>,
    ValidatedJson(input): ValidatedJson<MaterialInput>,
) -> ApiResult<Json<ApiResponse<MutationResponse>>> {
    let path = state.materials.update(&brand, &material, input).await?;
    Ok(Json(ApiResponse::ok(commit(&state, path).await?)))
}
