//! User persistence.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::user::{User, UserCreate, UserUpdate};
use crate::services::auth_service::AuthService;

const USER_COLUMNS: &str = "id, email, hashed_password, is_active, is_superuser, is_verified";

/// User service
#[derive(Clone)]
pub struct UserService {
    db: SqlitePool,
}

impl UserService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create a user, hashing the password.
    pub async fn create(&self, new_user: UserCreate) -> Result<User> {
        let email = normalize_email(&new_user.email)?;
        let hashed_password = AuthService::hash_password(&new_user.password)?;
        let id = Uuid::new_v4();

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, email, hashed_password, is_active, is_superuser, is_verified)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&email)
        .bind(&hashed_password)
        .bind(new_user.is_active)
        .bind(new_user.is_superuser)
        .bind(new_user.is_verified)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_unique_violation(e, format!("user {}", email)))?;

        tracing::info!(user_id = %user.id, "User created: {}", user.email);
        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user id={}", id)))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email.trim())
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    /// Apply a partial update. Unset fields keep their current value.
    pub async fn update(&self, id: Uuid, update: UserUpdate) -> Result<User> {
        let current = self.get(id).await?;

        let email = match update.email {
            Some(ref e) => normalize_email(e)?,
            None => current.email,
        };
        let hashed_password = match update.password {
            Some(ref p) => AuthService::hash_password(p)?,
            None => current.hashed_password,
        };

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET email = ?, hashed_password = ?, is_active = ?, is_superuser = ?, is_verified = ?
            WHERE id = ?
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&email)
        .bind(&hashed_password)
        .bind(update.is_active.unwrap_or(current.is_active))
        .bind(update.is_superuser.unwrap_or(current.is_superuser))
        .bind(update.is_verified.unwrap_or(current.is_verified))
        .bind(id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match AppError::from_unique_violation(e, email.clone()) {
            AppError::AlreadyExists(_) => {
                AppError::BadRequest("UPDATE_USER_EMAIL_ALREADY_EXISTS".to_string())
            }
            other => other,
        })?;

        Ok(user)
    }

    pub async fn mark_verified(&self, id: Uuid) -> Result<User> {
        self.update(
            id,
            UserUpdate {
                is_verified: Some(true),
                ..UserUpdate::default()
            },
        )
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user id={}", id)));
        }
        Ok(())
    }
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email.to_string()),
        _ => Err(AppError::Validation(format!("invalid email: {:?}", email))),
    }
}
