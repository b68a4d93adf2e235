//! Start-up user provisioning.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::user::{User, UserCreate};
use crate::services::user_service::UserService;

/// Outcome of provisioning the configured start-up user
#[derive(Debug)]
pub enum BootstrapOutcome {
    /// `USER_EMAIL` not configured
    Skipped,
    /// `USER_EMAIL` configured without `USER_PASSWORD`
    MissingPassword,
    /// A user with that e-mail was already present and left untouched
    AlreadyExists(User),
    Created(User),
}

/// Create the user named by `USER_EMAIL` / `USER_PASSWORD` if it is missing.
///
/// The user is active and verified so it can use the catalogue API right
/// away, but is not a superuser.
pub async fn provision_bootstrap_user(
    users: &UserService,
    config: &Config,
) -> Result<BootstrapOutcome> {
    let Some(email) = config.user_email.as_deref() else {
        return Ok(BootstrapOutcome::Skipped);
    };

    let Some(password) = config.user_password.as_deref() else {
        tracing::warn!(
            "USER_EMAIL is set to {} but USER_PASSWORD is not, skipping user creation",
            email
        );
        return Ok(BootstrapOutcome::MissingPassword);
    };

    if let Some(existing) = users.find_by_email(email).await? {
        tracing::info!("User {} already exists", existing.email);
        return Ok(BootstrapOutcome::AlreadyExists(existing));
    }

    let created = users
        .create(UserCreate {
            email: email.to_string(),
            password: password.to_string(),
            is_active: true,
            is_superuser: false,
            is_verified: true,
        })
        .await;

    match created {
        Ok(user) => Ok(BootstrapOutcome::Created(user)),
        // Lost a race against another instance starting at the same time.
        Err(AppError::AlreadyExists(_)) => {
            let user = users
                .find_by_email(email)
                .await?
                .ok_or_else(|| AppError::Internal(format!("user {} vanished", email)))?;
            Ok(BootstrapOutcome::AlreadyExists(user))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn users() -> UserService {
        let pool = db::create_pool("sqlite::memory:").await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        UserService::new(pool)
    }

    fn config(email: Option<&str>, password: Option<&str>) -> Config {
        let email = email.map(str::to_string);
        let password = password.map(str::to_string);
        Config::from_lookup(|k| match k {
            "USER_EMAIL" => email.clone(),
            "USER_PASSWORD" => password.clone(),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_skipped_without_email() {
        let users = users().await;
        let outcome = provision_bootstrap_user(&users, &config(None, Some("123")))
            .await
            .unwrap();
        assert!(matches!(outcome, BootstrapOutcome::Skipped));
    }

    #[tokio::test]
    async fn test_missing_password_creates_nothing() {
        let users = users().await;
        let outcome = provision_bootstrap_user(&users, &config(Some("test@api.com"), None))
            .await
            .unwrap();
        assert!(matches!(outcome, BootstrapOutcome::MissingPassword));
        assert!(users.find_by_email("test@api.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_idempotent() {
        let users = users().await;
        let cfg = config(Some("test@api.com"), Some("123"));

        let first = provision_bootstrap_user(&users, &cfg).await.unwrap();
        let created = match first {
            BootstrapOutcome::Created(user) => user,
            other => panic!("expected Created, got {:?}", other),
        };
        assert!(created.is_active);
        assert!(created.is_verified);
        assert!(!created.is_superuser);

        let second = provision_bootstrap_user(&users, &cfg).await.unwrap();
        match second {
            BootstrapOutcome::AlreadyExists(user) => assert_eq!(user.id, created.id),
            other => panic!("expected AlreadyExists, got {:?}", other),
        }
    }
}
