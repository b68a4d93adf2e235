//! Database connection pool setup and migrations.

use crate::error::{AppError, Result};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Translate a configured database URL into one sqlx understands.
///
/// Accepts SQLAlchemy driver URLs (`sqlite+aiosqlite:///relative/path`,
/// `sqlite+aiosqlite:////absolute/path`) as well as native sqlx SQLite URLs.
pub fn normalize_database_url(url: &str) -> Result<String> {
    let url = url.trim();

    if let Some(rest) = url.strip_prefix("sqlite+") {
        let path = rest
            .split_once(":///")
            .map(|(_, path)| path)
            .ok_or_else(|| AppError::Config(format!("Unsupported database URL: {}", url)))?;
        return Ok(sqlalchemy_path(path));
    }

    if let Some(path) = url.strip_prefix("sqlite:///") {
        return Ok(sqlalchemy_path(path));
    }

    if url.starts_with("sqlite:") {
        return Ok(url.to_string());
    }

    Err(AppError::Config(format!(
        "Unsupported database URL (only SQLite is supported): {}",
        url
    )))
}

fn sqlalchemy_path(path: &str) -> String {
    if path.is_empty() || path == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite://{}", path)
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Create a new database connection pool.
///
/// The database file is created when missing. In-memory databases are pinned
/// to a single long-lived connection, since every new connection would see an
/// empty database.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let url = normalize_database_url(database_url)?;
    let options = SqliteConnectOptions::from_str(&url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if is_in_memory(&url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
    };

    let pool = pool_options.connect_with(options).await?;

    Ok(pool)
}

/// Apply all pending migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlalchemy_relative_path() {
        assert_eq!(
            normalize_database_url("sqlite+aiosqlite:///adimen_test_db").unwrap(),
            "sqlite://adimen_test_db"
        );
    }

    #[test]
    fn test_sqlalchemy_absolute_path() {
        assert_eq!(
            normalize_database_url("sqlite+aiosqlite:////var/lib/adimen/db.sqlite").unwrap(),
            "sqlite:///var/lib/adimen/db.sqlite"
        );
    }

    #[test]
    fn test_sqlalchemy_without_driver() {
        assert_eq!(
            normalize_database_url("sqlite:///adimen.db").unwrap(),
            "sqlite://adimen.db"
        );
    }

    #[test]
    fn test_sqlalchemy_memory() {
        assert_eq!(
            normalize_database_url("sqlite+aiosqlite:///").unwrap(),
            "sqlite::memory:"
        );
    }

    #[test]
    fn test_native_urls_pass_through() {
        assert_eq!(
            normalize_database_url("sqlite::memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            normalize_database_url("sqlite://data/adimen.db?mode=rwc").unwrap(),
            "sqlite://data/adimen.db?mode=rwc"
        );
    }

    #[test]
    fn test_other_databases_rejected() {
        assert!(matches!(
            normalize_database_url("postgresql://localhost/adimen"),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            normalize_database_url("sqlite+aiosqlite:/broken"),
            Err(AppError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_pool_keeps_schema() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        sqlx::query("INSERT INTO brand (name) VALUES ('toyota')")
            .execute(&pool)
            .await
            .unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM brand")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
