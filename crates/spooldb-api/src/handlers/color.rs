//! Color reads, create/update, and size deletion.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use spooldb_core::AppError;
use spooldb_entity::VariantInput;
use spooldb_service::layout::dir_key;

use super::commit;
use crate::dto::response::{ApiResponse, MutationResponse};
use crate::error::ApiResult;
use crate::extractors::{ValidatedJson, Writable, parse_index};
use crate::state::AppState;

/// GET /api/brands/{brand}/materials/{material}/filaments/{filament}/colors/{color}
pub async fn get_color(
    State(state): State<AppState>,
    Path((brand, material, filament, color)): Path<(String, String, String, String)>,
) -> ApiResult<Response> {
    let keys = [
        dir_key("Brand", &brand)?,
        dir_key("Material", &material)?,
        dir_key("Filament", &filament)?,
        dir_key("Color", &color)?,
    ];
    let snapshot = state.cache.get().await?;
    let found = snapshot
        .database
        .color(&keys[0], &keys[1], &keys[2], &keys[3])
        .ok_or_else(|| AppError::not_found(format!("Color '{}' not found", keys.join("/"))))?;
    Ok(Json(ApiResponse::ok(found)).into_response())
}

/// POST .../filaments/{filament}/colors
pub async fn create_color(
    State(state): State<AppState>,
    _writable: Writable,
    Path((brand, material, filament)): Path<(String, String, String)>,
    ValidatedJson(input): ValidatedJson<VariantInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<MutationResponse>>)> {
    let path = state
        .variants
        .create(&brand, &material, &filament, input)
        .await?;
    let result = commit(&state, path).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(result))))
}

/// PUT .../colors/{color}
pub async fn update_color(
    State(state): State<AppState>,
    _writable: Writable,
    Path((brand, material, filament, color)): Path<(String, String, String, String)>,
    ValidatedJson(input): ValidatedJson<VariantInput>,
) -> ApiResult<Json<ApiResponse<MutationResponse>>> {
    let path = state
        .variants
        .update(&brand, &material, &filament, &color, input)
        .await?;
    Ok(Json(ApiResponse::ok(commit(&state, path).await?)))
}

/// DELETE .../colors/{color}/sizes/{index}
pub async fn delete_size(
    State(state): State<AppState>,
    _writable: Writable,
    Path((brand, material, filament, color, index)): Path<(String, String, String, String, String)>,
) -> ApiResult<Json<ApiResponse<MutationResponse>>> {
    let index = parse_index(&index)?;
    let path = state
        .variants
        .delete_size(&brand, &material, &filament, &color, index)
        .await?;
    Ok(Json(ApiResponse::ok(commit(&state, path).await?)))
}
