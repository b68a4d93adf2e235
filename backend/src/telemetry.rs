//! Telemetry initialization: tracing subscriber driven by `LOG_LEVEL`.
//!
//! `RUST_LOG`, when present, takes precedence over `LOG_LEVEL` so individual
//! targets can still be tuned without touching the application config.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, Result};

/// Map a log level name to a tracing filter.
///
/// Accepts the usual names case-insensitively, including the `WARNING` and
/// `CRITICAL` spellings found in existing deployment files.
pub fn level_filter(name: &str) -> Result<LevelFilter> {
    match name.trim().to_ascii_uppercase().as_str() {
        "TRACE" | "NOTSET" => Ok(LevelFilter::TRACE),
        "DEBUG" => Ok(LevelFilter::DEBUG),
        "INFO" => Ok(LevelFilter::INFO),
        "WARN" | "WARNING" => Ok(LevelFilter::WARN),
        "ERROR" | "CRITICAL" | "FATAL" => Ok(LevelFilter::ERROR),
        "OFF" => Ok(LevelFilter::OFF),
        other => Err(AppError::Config(format!("unknown LOG_LEVEL {:?}", other))),
    }
}

/// Default filter directives for a given level.
///
/// sqlx statement logging stays at warn unless explicitly requested.
fn default_directives(level: LevelFilter) -> String {
    format!("{},sqlx=warn", level.to_string().to_lowercase())
}

/// Initialize the global tracing subscriber.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init_tracing(log_level: &str) -> Result<()> {
    let level = level_filter(log_level)?;
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();

    Ok(())
}
