//! Brand reads and multipart create/update.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use spooldb_core::AppError;
use spooldb_entity::BrandInput;
use spooldb_service::layout::dir_key;

use super::commit;
use crate::dto::response::{ApiResponse, BrandSummary, MutationResponse};
use crate::error::ApiResult;
use crate::extractors::{EntityForm, Writable};
use crate::state::AppState;

/// GET /api/brands
pub async fn list_brands(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<BrandSummary>>>> {
    let snapshot = state.cache.get().await?;
    let brands = snapshot
        .database
        .brands
        .iter()
        .map(|(key, brand)| BrandSummary::new(key, brand))
        .collect();
    Ok(Json(ApiResponse::ok(brands)))
}

/// GET /api/brands/{brand}
pub async fn get_brand(
    State(state): State<AppState>,
    Path(brand): Path<String>,
) -> ApiResult<Response> {
    let key = dir_key("Brand", &brand)?;
    let snapshot = state.cache.get().await?;
    let brand = snapshot
        .database
        .brand(&key)
        .ok_or_else(|| AppError::not_found(format!("Brand '{key}' not found")))?;
    Ok(Json(ApiResponse::ok(brand)).into_response())
}

/// POST /api/brands
pub async fn create_brand(
    State(state): State<AppState>,
    _writable: Writable,
    form: EntityForm<BrandInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<MutationResponse>>)> {
    let path = state.brands.create(form.input, form.logo).await?;
    let result = commit(&state, path).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(result))))
}

/// PUT /api/brands/{brand}
pub async fn update_brand(
    State(state): State<AppState>,
    _writable: Writable,
    Path(brand): Path<String>,
    form: EntityForm<BrandInput>,
) -> ApiResult<Json<ApiResponse<MutationResponse>>> {
    let path = state.brands.update(&brand, form.input, form.logo).await?;
    Ok(Json(ApiResponse::ok(commit(&state, path).await?)))
}
