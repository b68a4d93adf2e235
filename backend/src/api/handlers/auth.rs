//! Authentication handlers.

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::api::SharedState;
use crate::error::Result;
use crate::models::user::UserRead;

/// Public auth routes (no auth required)
pub fn public_router() -> Router<SharedState> {
    Router::new()
        .route("/jwt/login", post(login))
        .route("/request-verify-token", post(request_verify_token))
        .route("/verify", post(verify))
}

/// Auth routes that need an active user
pub fn protected_router() -> Router<SharedState> {
    Router::new().route("/jwt/logout", post(logout))
}

/// OAuth2 password-flow form; `username` carries the e-mail address.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyTokenRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyRequest {
    pub token: String,
}

/// Log in with e-mail and password
#[utoipa::path(
    post,
    path = "/auth/jwt/login",
    tag = "auth",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access token issued", body = LoginResponse),
        (status = 400, description = "LOGIN_BAD_CREDENTIALS"),
    )
)]
pub async fn login(
    State(state): State<SharedState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<LoginResponse>> {
    let (user, access_token) = state.auth.authenticate(&form.username, &form.password).await?;
    tracing::info!(user_id = %user.id, "User {} logged in", user.email);

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// Log out
///
/// Tokens are stateless; the client discards its copy.
#[utoipa::path(
    post,
    path = "/auth/jwt/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Ask for an e-mail verification token
///
/// Always answers 202 so callers cannot probe which addresses exist.
#[utoipa::path(
    post,
    path = "/auth/request-verify-token",
    tag = "auth",
    request_body = VerifyTokenRequest,
    responses((status = 202, description = "Request accepted"))
)]
pub async fn request_verify_token(
    State(state): State<SharedState>,
    Json(payload): Json<VerifyTokenRequest>,
) -> Result<StatusCode> {
    state.auth.request_verify_token(&payload.email).await?;
    Ok(StatusCode::ACCEPTED)
}

/// Verify an e-mail address with a token
#[utoipa::path(
    post,
    path = "/auth/verify",
    tag = "auth",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "User verified", body = UserRead),
        (status = 400, description = "VERIFY_USER_BAD_TOKEN or VERIFY_USER_ALREADY_VERIFIED"),
    )
)]
pub async fn verify(
    State(state): State<SharedState>,
    Json(payload): Json<VerifyRequest>,
) -> Result<Json<UserRead>> {
    let user = state.auth.verify(&payload.token).await?;
    Ok(Json(user.into()))
}

#[derive(OpenApi)]
#[openapi(
    paths(login, logout, request_verify_token, verify),
    components(schemas(LoginForm, LoginResponse, VerifyTokenRequest, VerifyRequest))
)]
pub struct AuthApiDoc;
