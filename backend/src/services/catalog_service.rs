//! Brand and vehicle catalogue.
//!
//! Brand names are globally unique, vehicle names are unique per brand and a
//! brand owns its vehicles: deleting it removes them too.

use sqlx::SqlitePool;

use crate::error::{AppError, Result};
use crate::models::brand::{Brand, BrandCreate, BrandUpdate};
use crate::models::vehicle::{Vehicle, VehicleCreate, VehicleUpdate};

/// Catalogue service
#[derive(Clone)]
pub struct CatalogService {
    db: SqlitePool,
}

impl CatalogService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create_brand(&self, brand: BrandCreate) -> Result<Brand> {
        sqlx::query_as::<_, Brand>("INSERT INTO brand (name) VALUES (?) RETURNING id, name")
            .bind(&brand.name)
            .fetch_one(&self.db)
            .await
            .map_err(|e| AppError::from_unique_violation(e, brand.name.clone()))
    }

    pub async fn get_brand(&self, brand_id: i64) -> Result<Brand> {
        sqlx::query_as::<_, Brand>("SELECT id, name FROM brand WHERE id = ?")
            .bind(brand_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("brand id={}", brand_id)))
    }

    pub async fn update_brand(&self, brand_id: i64, update: BrandUpdate) -> Result<Brand> {
        sqlx::query_as::<_, Brand>("UPDATE brand SET name = ? WHERE id = ? RETURNING id, name")
            .bind(&update.name)
            .bind(brand_id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| AppError::from_unique_violation(e, update.name.clone()))?
            .ok_or_else(|| AppError::NotFound(format!("brand id={}", brand_id)))
    }

    /// Delete a brand together with all of its vehicles.
    pub async fn delete_brand(&self, brand_id: i64) -> Result<()> {
        let mut tx = self.db.begin().await?;

        let removed = sqlx::query("DELETE FROM vehicle WHERE brand_id = ?")
            .bind(brand_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let result = sqlx::query("DELETE FROM brand WHERE id = ?")
            .bind(brand_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("brand id={}", brand_id)));
        }

        tx.commit().await?;
        tracing::debug!(brand_id, vehicles = removed, "Brand removed with its vehicles");
        Ok(())
    }

    pub async fn create_vehicle(&self, vehicle: VehicleCreate) -> Result<Vehicle> {
        self.get_brand(vehicle.brand_id).await?;

        let existing = sqlx::query_as::<_, Vehicle>(
            "SELECT id, name, year, brand_id FROM vehicle WHERE name = ? AND brand_id = ?",
        )
        .bind(&vehicle.name)
        .bind(vehicle.brand_id)
        .fetch_optional(&self.db)
        .await?;

        if let Some(existing) = existing {
            return Err(AppError::AlreadyExists(format!(
                "vehicle exists id={} name={} brand_id={}",
                existing.id, existing.name, existing.brand_id
            )));
        }

        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicle (name, year, brand_id)
            VALUES (?, ?, ?)
            RETURNING id, name, year, brand_id
            "#,
        )
        .bind(&vehicle.name)
        .bind(vehicle.year)
        .bind(vehicle.brand_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_unique_violation(e, vehicle.name.clone()))
    }

    pub async fn get_vehicle(&self, vehicle_id: i64) -> Result<Vehicle> {
        sqlx::query_as::<_, Vehicle>("SELECT id, name, year, brand_id FROM vehicle WHERE id = ?")
            .bind(vehicle_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("vehicle id={}", vehicle_id)))
    }

    pub async fn update_vehicle(&self, vehicle_id: i64, update: VehicleUpdate) -> Result<Vehicle> {
        update.validate()?;
        let current = self.get_vehicle(vehicle_id).await?;

        let name = update.name.unwrap_or(current.name);
        let year = update.year.unwrap_or(current.year);

        sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicle SET name = ?, year = ?
            WHERE id = ?
            RETURNING id, name, year, brand_id
            "#,
        )
        .bind(&name)
        .bind(year)
        .bind(vehicle_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_unique_violation(e, name.clone()))
    }

    pub async fn delete_vehicle(&self, vehicle_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM vehicle WHERE id = ?")
            .bind(vehicle_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("vehicle id={}", vehicle_id)));
        }
        Ok(())
    }
}
