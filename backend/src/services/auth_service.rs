//! Authentication service.
//!
//! Handles credential checks, JWT issuing/validation and password hashing.
//! Two token kinds share one signing key and are told apart by audience:
//! access tokens (`adimen:auth`) and e-mail verification tokens
//! (`adimen:verify`).

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::user::User;
use crate::services::user_service::UserService;

/// Audience of access tokens
pub const AUTH_AUDIENCE: &str = "adimen:auth";

/// Audience of e-mail verification tokens
pub const VERIFY_AUDIENCE: &str = "adimen:verify";

/// Verification tokens are valid for one hour.
const VERIFY_TOKEN_LIFETIME_SECS: i64 = 3600;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// Email at the time of issue
    pub email: String,
    /// Audience, see `AUTH_AUDIENCE` / `VERIFY_AUDIENCE`
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Authentication service
pub struct AuthService {
    users: UserService,
    config: Arc<Config>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(db: SqlitePool, config: Arc<Config>) -> Self {
        let secret = config.jwt_secret.clone();
        Self {
            users: UserService::new(db),
            config,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Check e-mail and password, returning the user and a fresh access token.
    ///
    /// Unknown users, wrong passwords and inactive users are indistinguishable
    /// to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<(User, String)> {
        let bad_credentials = || AppError::BadRequest("LOGIN_BAD_CREDENTIALS".to_string());

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(bad_credentials)?;

        if !Self::verify_password(password, &user.hashed_password)? || !user.is_active {
            return Err(bad_credentials());
        }

        let token = self.generate_access_token(&user)?;
        Ok((user, token))
    }

    /// Sign an access token for a user
    pub fn generate_access_token(&self, user: &User) -> Result<String> {
        self.sign(user, AUTH_AUDIENCE, self.config.jwt_lifetime_seconds)
    }

    /// Sign an e-mail verification token for a user
    pub fn generate_verify_token(&self, user: &User) -> Result<String> {
        self.sign(user, VERIFY_AUDIENCE, VERIFY_TOKEN_LIFETIME_SECS)
    }

    fn sign(&self, user: &User, audience: &str, lifetime_secs: i64) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            aud: audience.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(lifetime_secs)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))
    }

    /// Validate and decode an access token
    pub fn validate_access_token(&self, token: &str) -> Result<Claims> {
        self.decode_token(token, AUTH_AUDIENCE)
            .map_err(|e| AppError::Authentication(format!("Invalid token: {}", e)))
    }

    /// Validate and decode a verification token
    pub fn validate_verify_token(&self, token: &str) -> Result<Claims> {
        self.decode_token(token, VERIFY_AUDIENCE)
            .map_err(|_| AppError::BadRequest("VERIFY_USER_BAD_TOKEN".to_string()))
    }

    fn decode_token(
        &self,
        token: &str,
        audience: &str,
    ) -> std::result::Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        validation.set_audience(&[audience]);
        decode::<Claims>(token, &self.decoding_key, &validation).map(|data| data.claims)
    }

    /// Resolve a bearer token to an active user.
    pub async fn user_from_access_token(&self, token: &str) -> Result<User> {
        let claims = self.validate_access_token(token)?;

        let user = match self.users.get(claims.sub).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => {
                return Err(AppError::Authentication("User not found".to_string()))
            }
            Err(e) => return Err(e),
        };

        if !user.is_active {
            return Err(AppError::Authentication("User is inactive".to_string()));
        }

        Ok(user)
    }

    /// Mark the user named by a verification token as verified.
    pub async fn verify(&self, token: &str) -> Result<User> {
        let claims = self.validate_verify_token(token)?;
        let bad_token = || AppError::BadRequest("VERIFY_USER_BAD_TOKEN".to_string());

        let user = self
            .users
            .find_by_email(&claims.email)
            .await?
            .filter(|u| u.id == claims.sub)
            .ok_or_else(bad_token)?;

        if user.is_verified {
            return Err(AppError::BadRequest(
                "VERIFY_USER_ALREADY_VERIFIED".to_string(),
            ));
        }

        let user = self.users.mark_verified(user.id).await?;
        tracing::info!(user_id = %user.id, "User {} has been verified", user.email);
        Ok(user)
    }

    /// Issue a verification token for an active, unverified user.
    ///
    /// Returns `None` when there is nothing to verify so callers can answer
    /// identically whether or not the address is known.
    pub async fn request_verify_token(&self, email: &str) -> Result<Option<String>> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) if user.is_active && !user.is_verified => user,
            _ => return Ok(None),
        };

        let token = self.generate_verify_token(&user)?;
        tracing::info!(
            user_id = %user.id,
            "Verification requested for user {}. Verification token: {}",
            user.email,
            token
        );
        Ok(Some(token))
    }

    /// Hash a password
    pub fn hash_password(password: &str) -> Result<String> {
        hash(password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against a hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
        verify(password, hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
    }
}
