//! Route definitions for the API.

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};

use super::handlers;
use super::middleware::auth::{auth_middleware, superuser_middleware, verified_middleware};
use super::middleware::tracing::correlation_id_middleware;
use super::SharedState;

/// Create the main router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // Health and OpenAPI (no auth required)
        .route("/health", get(handlers::health::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .nest("/auth", auth_routes(&state))
        .nest("/users", user_routes(&state))
        // Catalogue routes require an active, verified user
        .nest(
            "/api",
            handlers::brands::router()
                .merge(handlers::vehicles::router())
                .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB
                .layer(middleware::from_fn_with_state(
                    state.auth.clone(),
                    verified_middleware,
                )),
        )
        .layer(middleware::from_fn(correlation_id_middleware))
        .with_state(state)
}

fn auth_routes(state: &SharedState) -> Router<SharedState> {
    handlers::auth::public_router().merge(handlers::auth::protected_router().layer(
        middleware::from_fn_with_state(state.auth.clone(), auth_middleware),
    ))
}

fn user_routes(state: &SharedState) -> Router<SharedState> {
    handlers::users::me_router()
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .merge(
            handlers::users::admin_router().layer(middleware::from_fn_with_state(
                state.auth.clone(),
                superuser_middleware,
            )),
        )
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB
}
