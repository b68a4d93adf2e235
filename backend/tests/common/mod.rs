//! Common test utilities for API integration tests
//!
//! Every `TestContext` owns a fresh in-memory SQLite database, so tests are
//! independent and can run in parallel.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use url::form_urlencoded;

use adimen_backend::{
    api::{routes::create_router, AppState},
    config::Config,
    db,
    models::user::{User, UserCreate},
};

pub const TEST_EMAIL: &str = "test@api.com";
pub const TEST_PASSWORD: &str = "123";

/// Test context containing the router and shared state
pub struct TestContext {
    pub state: Arc<AppState>,
    pub app: Router,
}

impl TestContext {
    /// Create a context backed by a migrated in-memory database
    pub async fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some("integration-test-secret".to_string()),
            _ => None,
        })
        .expect("test config");

        let pool = db::create_pool("sqlite::memory:")
            .await
            .expect("Failed to open test database");
        db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let state = Arc::new(AppState::new(config, pool));
        let app = create_router(state.clone());
        Self { state, app }
    }

    /// Insert a user directly through the service layer
    pub async fn create_user(&self, email: &str, verified: bool, superuser: bool) -> User {
        self.state
            .users
            .create(UserCreate {
                email: email.to_string(),
                password: TEST_PASSWORD.to_string(),
                is_active: true,
                is_superuser: superuser,
                is_verified: verified,
            })
            .await
            .expect("Failed to create user")
    }

    /// Log in through the HTTP endpoint and return the access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self.login_raw(email, password).await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["access_token"]
            .as_str()
            .expect("No access token")
            .to_string()
    }

    pub async fn login_raw(&self, email: &str, password: &str) -> (StatusCode, Value) {
        let form = form_urlencoded::Serializer::new(String::new())
            .append_pair("username", email)
            .append_pair("password", password)
            .finish();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/auth/jwt/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        self.send(request).await
    }

    /// Verified user logged in with the default test credentials
    pub async fn verified_token(&self) -> String {
        self.create_user(TEST_EMAIL, true, false).await;
        self.login(TEST_EMAIL, TEST_PASSWORD).await
    }

    /// JSON request, optionally authenticated
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}
