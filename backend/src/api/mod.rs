//! API module - HTTP handlers and middleware.

pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;

use crate::config::Config;
use crate::services::auth_service::AuthService;
use crate::services::catalog_service::CatalogService;
use crate::services::user_service::UserService;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: SqlitePool,
    pub auth: Arc<AuthService>,
    pub users: UserService,
    pub catalog: CatalogService,
}

impl AppState {
    pub fn new(config: Config, db: SqlitePool) -> Self {
        let config = Arc::new(config);
        Self {
            auth: Arc::new(AuthService::new(db.clone(), config.clone())),
            users: UserService::new(db.clone()),
            catalog: CatalogService::new(db.clone()),
            config,
            db,
        }
    }
}

pub type SharedState = Arc<AppState>;
