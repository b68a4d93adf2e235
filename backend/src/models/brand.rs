//! Brand model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Vehicle manufacturer. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Brand {
    pub id: i64,
    pub name: String,
}

/// Payload for creating a brand
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BrandCreate {
    pub name: String,
}

/// Payload for renaming a brand
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BrandUpdate {
    pub name: String,
}
