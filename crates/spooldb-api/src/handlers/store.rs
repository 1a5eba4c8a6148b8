//! Store reads and multipart create/update.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use spooldb_core::AppError;
use spooldb_entity::StoreInput;
use spooldb_service::layout::dir_key;

use super::commit;
use crate::dto::response::{ApiResponse, MutationResponse};
use crate::error::ApiResult;
use crate::extractors::{EntityForm, Writable};
use crate::state::AppState;

/// GET /api/stores
pub async fn list_stores(State(state): State<AppState>) -> ApiResult<Response> {
    let snapshot = state.cache.get().await?;
    let stores: Vec<_> = snapshot.database.stores.values().collect();
    Ok(Json(ApiResponse::ok(stores)).into_response())
}

/// GET /api/stores/{store}
pub async fn get_store(
    State(state): State<AppState>,
    Path(store): Path<String>,
) -> ApiResult<Response> {
    let key = dir_key("Store", &store)?;
    let snapshot = state.cache.get().await?;
    let store = snapshot
        .database
        .store(&key)
        .ok_or_else(|| AppError::not_found(format!("Store '{key}' not found")))?;
    Ok(Json(ApiResponse::ok(store)).into_response())
}

/// POST /api/stores
pub async fn create_store(
    State(state): State<AppState>,
    _writable: Writable,
    form: EntityForm<StoreInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<MutationResponse>>)> {
    let path = state.stores.create(form.input, form.logo).await?;
    let result = commit(&state, path).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(result))))
}

/// PUT /api/stores/{store}
pub async fn update_store(
    State(state): State<AppState>,
    _writable: Writable,
    Path(store): Path<String>,
    form: EntityForm<StoreInput>,
) -> ApiResult<Json<ApiResponse<MutationResponse>>> {
    let path = state.stores.update(&store, form.input, form.logo).await?;
    Ok(Json(ApiResponse::ok(commit(&state, path).await?)))
}
