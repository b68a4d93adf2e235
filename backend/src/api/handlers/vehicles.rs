//! Vehicle handlers.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::api::SharedState;
use crate::error::Result;
use crate::models::vehicle::{Vehicle, VehicleCreate, VehicleUpdate};

/// Create vehicle routes
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/vehicle", post(create_vehicle))
        .route(
            "/vehicle/:vehicle_id",
            get(get_vehicle).patch(update_vehicle).delete(delete_vehicle),
        )
}

/// Create a vehicle under an existing brand
#[utoipa::path(
    post,
    path = "/api/vehicle",
    tag = "vehicle",
    request_body = VehicleCreate,
    responses(
        (status = 200, description = "Vehicle created", body = Vehicle),
        (status = 400, description = "Vehicle name already used in this brand"),
        (status = 404, description = "Brand not found"),
        (status = 422, description = "Invalid request body"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_vehicle(
    State(state): State<SharedState>,
    Json(payload): Json<VehicleCreate>,
) -> Result<Json<Vehicle>> {
    tracing::info!("creating vehicle {:?}", payload);
    let vehicle = state.catalog.create_vehicle(payload).await?;
    Ok(Json(vehicle))
}

/// Get a vehicle by ID
#[utoipa::path(
    get,
    path = "/api/vehicle/{vehicle_id}",
    tag = "vehicle",
    params(("vehicle_id" = i64, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle", body = Vehicle),
        (status = 404, description = "Vehicle not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_vehicle(
    State(state): State<SharedState>,
    Path(vehicle_id): Path<i64>,
) -> Result<Json<Vehicle>> {
    tracing::info!("getting vehicle {}", vehicle_id);
    let vehicle = state.catalog.get_vehicle(vehicle_id).await?;
    Ok(Json(vehicle))
}

/// Update a vehicle's name and/or year
#[utoipa::path(
    patch,
    path = "/api/vehicle/{vehicle_id}",
    tag = "vehicle",
    params(("vehicle_id" = i64, Path, description = "Vehicle ID")),
    request_body = VehicleUpdate,
    responses(
        (status = 200, description = "Vehicle updated", body = Vehicle),
        (status = 404, description = "Vehicle not found"),
        (status = 422, description = "Neither name nor year given"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_vehicle(
    State(state): State<SharedState>,
    Path(vehicle_id): Path<i64>,
    Json(payload): Json<VehicleUpdate>,
) -> Result<Json<Vehicle>> {
    tracing::info!("updating vehicle: {} with {:?}", vehicle_id, payload);
    let vehicle = state.catalog.update_vehicle(vehicle_id, payload).await?;
    tracing::info!("updated vehicle: {}", vehicle_id);
    Ok(Json(vehicle))
}

/// Delete a vehicle
#[utoipa::path(
    delete,
    path = "/api/vehicle/{vehicle_id}",
    tag = "vehicle",
    params(("vehicle_id" = i64, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle deleted"),
        (status = 404, description = "Vehicle not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_vehicle(
    State(state): State<SharedState>,
    Path(vehicle_id): Path<i64>,
) -> Result<()> {
    tracing::info!("deleting vehicle: {}", vehicle_id);
    state.catalog.delete_vehicle(vehicle_id).await
}

#[derive(OpenApi)]
#[openapi(
    paths(create_vehicle, get_vehicle, update_vehicle, delete_vehicle),
    components(schemas(Vehicle, VehicleCreate, VehicleUpdate))
)]
pub struct VehiclesApiDoc;
