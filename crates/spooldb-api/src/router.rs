//! Route definitions for the SpoolDB HTTP API.
//!
//! All routes are organized by catalog level and mounted under `/api`.
//! Catalog paths address entities by directory key; a display name is
//! accepted too and slugged before lookup.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

const FILAMENT: &str = "/brands/{brand}/materials/{material}/filaments/{filament}";

/// Build the API router with its state. Outer layers are added by
/// [`build_app`](crate::app::build_app).
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(catalog_routes())
        .merge(brand_routes())
        .merge(color_routes())
        .merge(store_routes())
        .merge(integrity_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Whole-database reads and the forced rebuild
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(handlers::catalog::get_catalog))
        .route("/catalog/info", get(handlers::catalog::catalog_info))
        .route("/catalog/refresh", post(handlers::catalog::refresh_catalog))
}

/// Brands, materials and filaments
fn brand_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/brands",
            get(handlers::brand::list_brands).post(handlers::brand::create_brand),
        )
        .route(
            "/brands/{brand}",
            get(handlers::brand::get_brand).put(handlers::brand::update_brand),
        )
        .route(
            "/brands/{brand}/materials",
            post(handlers::material::create_material),
        )
        .route(
            "/brands/{brand}/materials/{material}",
            put(handlers::material::update_material),
        )
        .route(
            "/brands/{brand}/materials/{material}/filaments",
            post(handlers::filament::create_filament),
        )
        .route(FILAMENT, put(handlers::filament::update_filament))
}

/// Colors and their sizes
fn color_routes() -> Router<AppState> {
    Router::new()
        .route(
            &format!("{FILAMENT}/colors"),
            post(handlers::color::create_color),
        )
        .route(
            &format!("{FILAMENT}/colors/{{color}}"),
            get(handlers::color::get_color).put(handlers::color::update_color),
        )
        .route(
            &format!("{FILAMENT}/colors/{{color}}/sizes/{{index}}"),
            delete(handlers::color::delete_size),
        )
}

fn store_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/stores",
            get(handlers::store::list_stores).post(handlers::store::create_store),
        )
        .route(
            "/stores/{store}",
            get(handlers::store::get_store).put(handlers::store::update_store),
        )
}

fn integrity_routes() -> Router<AppState> {
    Router::new().route("/integrity", get(handlers::integrity::check_integrity))
}
