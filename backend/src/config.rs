//! Application configuration loaded from environment variables.

use crate::error::{AppError, Result};
use crate::telemetry;
use rand::{distr::Alphanumeric, Rng};
use std::env;
use std::net::SocketAddr;
use url::Url;

/// SQLAlchemy-style default kept so existing `.env` files keep working.
pub const DEFAULT_DB_URL: &str = "sqlite+aiosqlite:///adimen_test_db";

/// Application configuration
#[derive(Clone)]
pub struct Config {
    /// Log level name (TRACE, DEBUG, INFO, WARNING, ERROR, CRITICAL)
    pub log_level: String,

    /// Database connection URL, as configured
    pub database_url: String,

    /// SQS queue to long-poll; the consumer is not started without it
    pub sqs_queue_url: Option<Url>,

    /// Maximum number of messages per receive call (1..=10)
    pub sqs_max_messages: i32,

    /// Long-poll wait per receive call, in seconds
    pub sqs_wait_time_seconds: i32,

    /// Bootstrap user created on start
    pub user_email: Option<String>,

    /// Password for the bootstrap user
    pub user_password: Option<String>,

    /// Server bind address (host:port)
    pub bind_address: String,

    /// HMAC secret used to sign access and verification tokens
    pub jwt_secret: String,

    /// `JWT_SECRET` was unset and a random secret was generated for this process
    pub jwt_secret_generated: bool,

    /// Access token lifetime in seconds
    pub jwt_lifetime_seconds: i64,
}

redacted_debug!(Config {
    show log_level,
    show database_url,
    show sqs_queue_url,
    show sqs_max_messages,
    show sqs_wait_time_seconds,
    show user_email,
    redact_option user_password,
    show bind_address,
    redact jwt_secret,
    show jwt_secret_generated,
    show jwt_lifetime_seconds,
});

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let log_level = get("LOG_LEVEL").unwrap_or_else(|| "INFO".into());
        telemetry::level_filter(&log_level)?;

        let sqs_queue_url = get("SQS_QUEUE_URL")
            .map(|raw| {
                Url::parse(&raw)
                    .map_err(|e| AppError::Config(format!("SQS_QUEUE_URL is not a URL: {}", e)))
            })
            .transpose()?;

        let configured_secret = get("JWT_SECRET");
        let jwt_secret_generated = configured_secret.is_none();
        let jwt_secret = configured_secret.unwrap_or_else(|| {
            rand::rng()
                .sample_iter(&Alphanumeric)
                .take(48)
                .map(char::from)
                .collect()
        });

        Ok(Self {
            log_level,
            database_url: get("DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.into()),
            sqs_queue_url,
            sqs_max_messages: parse_or::<i32>("SQS_MAX_MESSAGES", get("SQS_MAX_MESSAGES"), 10)?
                .clamp(1, 10),
            // SQS rejects long-poll waits outside 0..=20 seconds
            sqs_wait_time_seconds: parse_or::<i32>(
                "SQS_WAIT_TIME_SECONDS",
                get("SQS_WAIT_TIME_SECONDS"),
                5,
            )?
            .clamp(0, 20),
            user_email: get("USER_EMAIL"),
            user_password: get("USER_PASSWORD"),
            bind_address: parse_or::<SocketAddr>(
                "BIND_ADDRESS",
                get("BIND_ADDRESS"),
                SocketAddr::from(([0, 0, 0, 0], 8000)),
            )?
            .to_string(),
            jwt_secret,
            jwt_secret_generated,
            jwt_lifetime_seconds: parse_or(
                "JWT_LIFETIME_SECONDS",
                get("JWT_LIFETIME_SECONDS"),
                3600,
            )?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has invalid value {:?}", key, v))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.log_level, "INFO");
        assert_eq!(config.database_url, DEFAULT_DB_URL);
        assert!(config.sqs_queue_url.is_none());
        assert!(config.user_email.is_none());
        assert!(config.user_password.is_none());
        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert_eq!(config.sqs_max_messages, 10);
        assert_eq!(config.sqs_wait_time_seconds, 5);
        assert_eq!(config.jwt_lifetime_seconds, 3600);
        assert_eq!(config.jwt_secret.len(), 48);
    }

    #[test]
    fn test_reads_documented_variables() {
        let config = load(&[
            ("LOG_LEVEL", "debug"),
            ("DB_URL", "sqlite::memory:"),
            (
                "SQS_QUEUE_URL",
                "https://sqs.eu-west-1.amazonaws.com/123456789012/vehicles",
            ),
            ("USER_EMAIL", "test@api.com"),
            ("USER_PASSWORD", "123"),
        ])
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(
            config.sqs_queue_url.as_ref().map(Url::as_str),
            Some("https://sqs.eu-west-1.amazonaws.com/123456789012/vehicles")
        );
        assert_eq!(config.user_email.as_deref(), Some("test@api.com"));
        assert_eq!(config.user_password.as_deref(), Some("123"));
    }

    #[test]
    fn test_invalid_queue_url_is_rejected() {
        let err = load(&[("SQS_QUEUE_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let err = load(&[("LOG_LEVEL", "LOUD")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = load(&[("USER_EMAIL", ""), ("SQS_QUEUE_URL", "  ")]).unwrap();
        assert!(config.user_email.is_none());
        assert!(config.sqs_queue_url.is_none());
    }

    #[test]
    fn test_max_messages_is_clamped() {
        let config = load(&[("SQS_MAX_MESSAGES", "50")]).unwrap();
        assert_eq!(config.sqs_max_messages, 10);
        let err = load(&[("SQS_MAX_MESSAGES", "lots")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_wait_time_is_clamped() {
        assert_eq!(load(&[("SQS_WAIT_TIME_SECONDS", "60")]).unwrap().sqs_wait_time_seconds, 20);
        assert_eq!(load(&[("SQS_WAIT_TIME_SECONDS", "-3")]).unwrap().sqs_wait_time_seconds, 0);
        assert_eq!(load(&[("SQS_WAIT_TIME_SECONDS", "12")]).unwrap().sqs_wait_time_seconds, 12);
    }

    #[test]
    fn test_blank_jwt_secret_is_generated() {
        let config = load(&[("JWT_SECRET", "   ")]).unwrap();
        assert!(config.jwt_secret_generated);
        assert_eq!(config.jwt_secret.len(), 48);

        let config = load(&[("JWT_SECRET", "fixed")]).unwrap();
        assert!(!config.jwt_secret_generated);
        assert_eq!(config.jwt_secret, "fixed");
    }

    #[test]
    fn test_bind_address_must_be_socket_addr() {
        let config = load(&[("BIND_ADDRESS", "127.0.0.1:9000")]).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        let err = load(&[("BIND_ADDRESS", "localhost")]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = load(&[
            ("JWT_SECRET", "very-secret-signing-key"),
            ("USER_PASSWORD", "hunter2"),
        ])
        .unwrap();
        let output = format!("{:?}", config);
        assert!(!output.contains("very-secret-signing-key"));
        assert!(!output.contains("hunter2"));
        assert!(output.contains("[REDACTED]"));
    }
}
