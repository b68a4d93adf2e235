//! Vehicle model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, Result};

/// A vehicle model belonging to a brand.
///
/// `name` is unique per brand; the same name may appear under other brands.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Vehicle {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub brand_id: i64,
}

/// Payload for creating a vehicle
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VehicleCreate {
    pub name: String,
    pub year: i32,
    pub brand_id: i64,
}

/// Partial update; at least one field must be present.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct VehicleUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl VehicleUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_none() && self.year.is_none() {
            return Err(AppError::Validation(
                "year or name should be passed".to_string(),
            ));
        }
        Ok(())
    }
}
