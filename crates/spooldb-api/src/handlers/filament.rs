//! Filament create/update.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use spooldb_entity::FilamentInput;

use super::commit;
use crate::dto::response::{ApiResponse, MutationResponse};
use crate::error::ApiResult;
use crate::extractors::{ValidatedJson, Writable};
use crate::state::AppState;

/// POST /api/brands/{brand}/materials/{material}/filaments
pub async fn create_filament(
    State(state): State<AppState>,
    _writable: Writable,
    Path((brand, material)): Path<(String, String)>,
    ValidatedJson(input): ValidatedJson<FilamentInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<MutationResponse>>)> {
    let path = state.filaments.create(&brand, &material, input).await?;
    let result = commit(&state, path).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(result))))
}

/// PUT /api/brands/{brand}/materials/{material}/filaments/{filament}
pub async fn update_filament(
    State(state): State<AppState>,
    _writable: Writable,
    Path((brand, material, filament)): Path<(String, String, String)>,
    ValidatedJson(input): ValidatedJson<FilamentInput>,
) -> ApiResult<Json<ApiResponse<MutationResponse>>> {
    let path = state
        .filaments
        .update(&brand, &material, &filament, input)
        .await?;
    Ok(Json(ApiResponse::ok(commit(&state, path).await?)))
}
