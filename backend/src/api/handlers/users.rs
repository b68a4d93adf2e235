//! User handlers.
//!
//! `/users/me` is open to any active user; `/users/{id}` is superuser-only.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use utoipa::OpenApi;
use uuid::Uuid;

use crate::api::middleware::auth::AuthExtension;
use crate::api::SharedState;
use crate::error::Result;
use crate::models::user::{UserRead, UserUpdate};

/// Routes for the authenticated user's own account
pub fn me_router() -> Router<SharedState> {
    Router::new().route("/me", get(get_me).patch(update_me))
}

/// Superuser routes for managing any account
pub fn admin_router() -> Router<SharedState> {
    Router::new().route(
        "/:id",
        get(get_user).patch(update_user).delete(delete_user),
    )
}

/// Get the current user
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = UserRead),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
) -> Result<Json<UserRead>> {
    let user = state.users.get(auth.user_id).await?;
    Ok(Json(user.into()))
}

/// Update the current user's e-mail or password
///
/// Flag fields in the body are ignored here.
#[utoipa::path(
    patch,
    path = "/users/me",
    tag = "users",
    request_body = UserUpdate,
    responses(
        (status = 200, description = "User updated", body = UserRead),
        (status = 400, description = "UPDATE_USER_EMAIL_ALREADY_EXISTS"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_me(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserRead>> {
    let user = state.users.update(auth.user_id, payload.safe()).await?;
    Ok(Json(user.into()))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserRead),
        (status = 403, description = "Superuser access required"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserRead>> {
    let user = state.users.get(id).await?;
    Ok(Json(user.into()))
}

/// Update any field of a user
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "User updated", body = UserRead),
        (status = 400, description = "UPDATE_USER_EMAIL_ALREADY_EXISTS"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserRead>> {
    tracing::info!("user {} updating user {}", auth.email, id);
    let user = state.users.update(id, payload).await?;
    Ok(Json(user.into()))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthExtension>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    tracing::info!("user {} deleting user {}", auth.email, id);
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(OpenApi)]
#[openapi(
    paths(get_me, update_me, get_user, update_user, delete_user),
    components(schemas(UserRead, UserUpdate))
)]
pub struct UsersApiDoc;
