//! Database initialization
//!
//! Creates the SQLite database on first run, applies the schema and
//! default settings, and runs pending migrations. Safe to call on every
//! startup: all steps are idempotent.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc creates the database file when missing
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    configure_connection(&pool).await?;
    create_schema(&pool).await?;

    // Versioned migrations run after the base schema exists
    crate::db::migrations::run_migrations(&pool).await?;

    init_default_settings(&pool).await?;

    Ok(pool)
}

/// Create an in-memory database with the full schema, for tests
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        // A second connection would see a different empty :memory: database
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    configure_connection(&pool).await?;
    create_schema(&pool).await?;
    crate::db::migrations::run_migrations(&pool).await?;
    init_default_settings(&pool).await?;

    Ok(pool)
}

async fn configure_connection(pool: &SqlitePool) -> Result<()> {
    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    // WAL allows concurrent readers with one writer, so queue polling
    // never blocks behind a mutation
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_settings_table(pool).await?;
    create_requests_table(pool).await?;
    Ok(())
}

async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_requests_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS requests (
            id TEXT PRIMARY KEY,
            requester_name TEXT NOT NULL,
            song_title TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'played', 'skipped')),
            display_order INTEGER NOT NULL,
            payment_reference TEXT UNIQUE,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Range queries on (status, display_order) drive both queue views
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_requests_status_order ON requests(status, display_order)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert a setting only if the key does not already exist
pub async fn ensure_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;
    Ok(())
}

/// Read a setting value, if present
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(value,)| value))
}

/// Seed default settings on first run.
///
/// The admin password comes from `SONGDROP_ADMIN_PASSWORD` when set;
/// otherwise a random one is generated and logged once so the operator
/// can log in to a fresh deployment.
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    ensure_setting(pool, "public_poll_interval_ms", "5000").await?;
    ensure_setting(pool, "session_ttl_hours", "12").await?;

    if get_setting(pool, "admin_password").await?.is_none() {
        let password = match std::env::var("SONGDROP_ADMIN_PASSWORD") {
            Ok(p) if !p.is_empty() => p,
            _ => {
                let generated = crate::session::generate_password();
                info!("Generated admin password: {}", generated);
                generated
            }
        };
        ensure_setting(pool, "admin_password", &password).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_database_has_schema_and_defaults() {
        let pool = init_memory_database().await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM requests")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);

        let password = get_setting(&pool, "admin_password").await.unwrap();
        assert!(password.is_some());
    }

    #[tokio::test]
    async fn payment_reference_is_unique_at_storage_level() {
        let pool = init_memory_database().await.unwrap();

        let insert = "INSERT INTO requests (id, requester_name, song_title, display_order, payment_reference) \
                      VALUES (?, 'Alice', 'Song A', 0, 'ref-1')";
        sqlx::query(insert)
            .bind(uuid::Uuid::new_v4().to_string())
            .execute(&pool)
            .await
            .unwrap();

        let duplicate = sqlx::query(insert)
            .bind(uuid::Uuid::new_v4().to_string())
            .execute(&pool)
            .await;
        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn init_is_idempotent_on_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("songdrop.db");

        let pool = init_database(&db_path).await.unwrap();
        drop(pool);

        // Second open must not fail or reset settings
        let pool = init_database(&db_path).await.unwrap();
        let interval = get_setting(&pool, "public_poll_interval_ms").await.unwrap();
        assert_eq!(interval.as_deref(), Some("5000"));
    }
}
