//! OpenAPI document generated from handler annotations via utoipa.

use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Top-level OpenAPI document.
///
/// Each handler module contributes its own paths and schemas through a
/// per-module `#[derive(OpenApi)]` struct merged in [`build_openapi`].
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Adimen API",
        description = "Vehicle catalogue with JWT-authenticated users.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login, logout and e-mail verification"),
        (name = "users", description = "Current user and user administration"),
        (name = "brand", description = "Vehicle brands"),
        (name = "vehicle", description = "Vehicles belonging to a brand"),
        (name = "health", description = "Health checks"),
    ),
    components(schemas(ErrorResponse))
)]
pub struct ApiDoc;

/// Error body returned by every endpoint on failure.
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g. "NOT_FOUND", "LOGIN_BAD_CREDENTIALS")
    pub code: String,
    /// Human-readable error message
    pub error: String,
}

/// Adds Bearer JWT security scheme to the document.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Build the merged OpenAPI document from all handler modules.
pub fn build_openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();

    doc.merge(super::handlers::auth::AuthApiDoc::openapi());
    doc.merge(super::handlers::users::UsersApiDoc::openapi());
    doc.merge(super::handlers::brands::BrandsApiDoc::openapi());
    doc.merge(super::handlers::vehicles::VehiclesApiDoc::openapi());
    doc.merge(super::handlers::health::HealthApiDoc::openapi());

    doc
}

/// Serve the OpenAPI document as JSON.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(build_openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_is_valid() {
        let doc = build_openapi();
        assert_eq!(doc.info.title, "Adimen API");

        let has_bearer = doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth"));
        assert!(has_bearer, "Bearer auth security scheme is missing.");

        let tags: Vec<&str> = doc
            .tags
            .as_ref()
            .map_or(vec![], |t| t.iter().map(|tag| tag.name.as_str()).collect());
        for expected in ["auth", "users", "brand", "vehicle", "health"] {
            assert!(tags.contains(&expected), "Missing expected tag: {expected}");
        }
    }

    #[test]
    fn test_all_endpoints_documented() {
        let doc = build_openapi();
        for path in [
            "/health",
            "/auth/jwt/login",
            "/auth/jwt/logout",
            "/auth/request-verify-token",
            "/auth/verify",
            "/users/me",
            "/users/{id}",
            "/api/brand",
            "/api/brand/{brand_id}",
            "/api/vehicle",
            "/api/vehicle/{vehicle_id}",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "{path} is missing from the OpenAPI document"
            );
        }

        let brand = &doc.paths.paths["/api/brand/{brand_id}"];
        assert!(brand.get.is_some());
        assert!(brand.patch.is_some());
        assert!(brand.delete.is_some());
    }

    #[test]
    fn test_error_schema_registered() {
        let doc = build_openapi();
        let json = serde_json::to_value(&doc).unwrap();
        let props = &json["components"]["schemas"]["ErrorResponse"]["properties"];
        assert!(props.get("code").is_some());
        assert!(props.get("error").is_some());
    }
}
