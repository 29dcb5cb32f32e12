//! Database connection pool
//!
//! SQLite-backed connection pool used by all repositories. The pool is
//! created from the database configuration; parent directories for
//! file-backed databases are created on demand.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::config::DatabaseConfig;

/// Create a SQLite connection pool based on configuration.
///
/// Accepts plain file paths, `sqlite:` URLs, and `:memory:` for an
/// in-memory database.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    let url = &config.url;
    let in_memory = url == ":memory:" || url.starts_with("sqlite::memory:");

    // Ensure the database directory exists for file-based SQLite
    if !in_memory {
        let path = if url.starts_with("sqlite:") {
            url.trim_start_matches("sqlite:")
        } else {
            url.as_str()
        };

        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {:?}", parent)
                })?;
            }
        }
    }

    let connection_url = if in_memory {
        "sqlite::memory:".to_string()
    } else if url.starts_with("sqlite:") {
        url.to_string()
    } else {
        format!("sqlite:{}", url)
    };

    let options = SqliteConnectOptions::from_str(&connection_url)
        .with_context(|| format!("Invalid database URL: {}", url))?
        .create_if_missing(true)
        // Applied per connection, unlike a one-off PRAGMA statement
        .foreign_keys(true);

    // An in-memory database lives and dies with its connection, so the
    // pool must hold exactly one and never recycle it.
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(20)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to connect to SQLite database: {}", url))?;

    Ok(pool)
}

/// Create a SQLite in-memory database pool for testing
pub async fn create_test_pool() -> Result<SqlitePool> {
    let config = DatabaseConfig {
        url: ":memory:".to_string(),
    };
    create_pool(&config).await
}
