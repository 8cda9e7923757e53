//! Database schema migrations
//!
//! Versioned migrations allow seamless upgrades of existing databases
//! without manual deletion or data loss. Migrations are idempotent and
//! safe to run multiple times; never modify an existing migration, add a
//! new one instead.

use crate::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Current schema version
///
/// **IMPORTANT:** Increment this when adding new migrations
const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Get current schema version from database
///
/// Returns 0 if schema_version table doesn't exist or has no rows
async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    let table_exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM sqlite_master
            WHERE type='table' AND name='schema_version'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> =
        sqlx::query_scalar("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
            .fetch_optional(pool)
            .await?;

    Ok(version.unwrap_or(0))
}

/// Set schema version in database
async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("INSERT OR REPLACE INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;
    Ok(())
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )
        "#,
    )
    .execute(pool)
    .await?;

    let current = get_schema_version(pool).await?;

    if current < 1 {
        migrate_v1(pool).await?;
        set_schema_version(pool, 1).await?;
    }

    if current < CURRENT_SCHEMA_VERSION {
        info!(
            "Database migrated from schema v{} to v{}",
            current, CURRENT_SCHEMA_VERSION
        );
    }

    Ok(())
}

/// Migration v1: add `payment_reference` to databases created before the
/// paid-request flow existed. Fresh databases already have the column from
/// the base schema, so the pragma check keeps this idempotent.
async fn migrate_v1(pool: &SqlitePool) -> Result<()> {
    let has_column: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pragma_table_info('requests') WHERE name = 'payment_reference'",
    )
    .fetch_one(pool)
    .await?;

    if has_column == 0 {
        sqlx::query("ALTER TABLE requests ADD COLUMN payment_reference TEXT")
            .execute(pool)
            .await?;
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_requests_payment_reference \
             ON requests(payment_reference) WHERE payment_reference IS NOT NULL",
        )
        .execute(pool)
        .await?;
        info!("Migration v1: Added payment_reference to requests table");
    }

    Ok(())
}
