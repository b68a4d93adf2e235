//! Authentication middleware.
//!
//! Resolves `Authorization: Bearer <jwt>` to a user and enforces one of
//! three access levels:
//! - active user (401 otherwise)
//! - active and verified user (additionally 403 when unverified)
//! - superuser (additionally 403 for everybody else)

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::User;
use crate::services::auth_service::AuthService;

/// Extension that holds authenticated user information
#[derive(Debug, Clone)]
pub struct AuthExtension {
    pub user_id: Uuid,
    pub email: String,
}

impl From<User> for AuthExtension {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
        }
    }
}

/// Access level required by a route group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessLevel {
    Active,
    Verified,
    Superuser,
}

/// Token extraction result
#[derive(Debug, PartialEq, Eq)]
enum ExtractedToken<'a> {
    Bearer(&'a str),
    None,
    Invalid,
}

fn extract_token_from_auth_header(auth_header: &str) -> ExtractedToken<'_> {
    match auth_header.split_once(' ') {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() =>
        {
            ExtractedToken::Bearer(token.trim())
        }
        _ => ExtractedToken::Invalid,
    }
}

fn extract_token(request: &Request) -> ExtractedToken<'_> {
    match request.headers().get(AUTHORIZATION) {
        Some(value) => match value.to_str() {
            Ok(header) => extract_token_from_auth_header(header),
            Err(_) => ExtractedToken::Invalid,
        },
        None => ExtractedToken::None,
    }
}

async fn authorize(
    auth_service: &AuthService,
    extracted: ExtractedToken<'_>,
    level: AccessLevel,
) -> Result<AuthExtension, AppError> {
    let token = match extracted {
        ExtractedToken::Bearer(token) => token,
        ExtractedToken::None => {
            return Err(AppError::Authentication(
                "Missing authorization header".to_string(),
            ))
        }
        ExtractedToken::Invalid => {
            return Err(AppError::Authentication(
                "Invalid authorization header format".to_string(),
            ))
        }
    };

    let user = auth_service.user_from_access_token(token).await?;

    match level {
        AccessLevel::Verified if !user.is_verified => {
            Err(AppError::Authorization("User is not verified".to_string()))
        }
        AccessLevel::Superuser if !user.is_superuser => {
            Err(AppError::Authorization("Superuser access required".to_string()))
        }
        _ => Ok(AuthExtension::from(user)),
    }
}

async fn guard(
    auth_service: Arc<AuthService>,
    mut request: Request,
    next: Next,
    level: AccessLevel,
) -> Response {
    let authorized = authorize(&auth_service, extract_token(&request), level).await;
    match authorized {
        Ok(auth_ext) => {
            request.extensions_mut().insert(auth_ext);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Requires a valid token for an active user
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    request: Request,
    next: Next,
) -> Response {
    guard(auth_service, request, next, AccessLevel::Active).await
}

/// Requires an active user whose e-mail has been verified
pub async fn verified_middleware(
    State(auth_service): State<Arc<AuthService>>,
    request: Request,
    next: Next,
) -> Response {
    guard(auth_service, request, next, AccessLevel::Verified).await
}

/// Requires an active superuser
pub async fn superuser_middleware(
    State(auth_service): State<Arc<AuthService>>,
    request: Request,
    next: Next,
) -> Response {
    guard(auth_service, request, next, AccessLevel::Superuser).await
}
