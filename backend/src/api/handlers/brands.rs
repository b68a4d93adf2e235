//! Brand handlers.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::api::SharedState;
use crate::error::Result;
use crate::models::brand::{Brand, BrandCreate, BrandUpdate};

/// Create brand routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/brand", post(create_brand))
        .route(
            "/brand/:brand_id",
            get(get_brand).patch(update_brand).delete(delete_brand),
        )
}

/// Create a brand
#[utoipa::path(
    post,
    path = "/api/brand",
    tag = "brand",
    request_body = BrandCreate,
    responses(
        (status = 200, description = "Brand created", body = Brand),
        (status = 400, description = "Brand name already exists"),
        (status = 422, description = "Invalid request body"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_brand(
    State(state): State<SharedState>,
    Json(payload): Json<BrandCreate>,
) -> Result<Json<Brand>> {
    let brand = state.catalog.create_brand(payload).await?;
    tracing::info!("created brand: {:?}", brand);
    Ok(Json(brand))
}

/// Get a brand by ID
#[utoipa::path(
    get,
    path = "/api/brand/{brand_id}",
    tag = "brand",
    params(("brand_id" = i64, Path, description = "Brand ID")),
    responses(
        (status = 200, description = "Brand", body = Brand),
        (status = 404, description = "Brand not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_brand(
    State(state): State<SharedState>,
    Path(brand_id): Path<i64>,
) -> Result<Json<Brand>> {
    let brand = state.catalog.get_brand(brand_id).await?;
    tracing::info!("got brand: {:?}", brand);
    Ok(Json(brand))
}

/// Rename a brand
#[utoipa::path(
    patch,
    path = "/api/brand/{brand_id}",
    tag = "brand",
    params(("brand_id" = i64, Path, description = "Brand ID")),
    request_body = BrandUpdate,
    responses(
        (status = 200, description = "Brand updated", body = Brand),
        (status = 400, description = "Brand name already exists"),
        (status = 404, description = "Brand not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_brand(
    State(state): State<SharedState>,
    Path(brand_id): Path<i64>,
    Json(payload): Json<BrandUpdate>,
) -> Result<Json<Brand>> {
    tracing::info!("updating brand: {} with {:?}", brand_id, payload);
    let brand = state.catalog.update_brand(brand_id, payload).await?;
    tracing::info!("updated brand: {}", brand_id);
    Ok(Json(brand))
}

/// Delete a brand and its vehicles
#[utoipa::path(
    delete,
    path = "/api/brand/{brand_id}",
    tag = "brand",
    params(("brand_id" = i64, Path, description = "Brand ID")),
    responses(
        (status = 200, description = "Brand deleted"),
        (status = 404, description = "Brand not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_brand(
    State(state): State<SharedState>,
    Path(brand_id): Path<i64>,
) -> Result<()> {
    tracing::info!("deleting brand: {}", brand_id);
    state.catalog.delete_brand(brand_id).await
}

#[derive(OpenApi)]
#[openapi(
    paths(create_brand, get_brand, update_brand, delete_brand),
    components(schemas(Brand, BrandCreate, BrandUpdate))
)]
pub struct BrandsApiDoc;
