//! Database module
//!
//! Schema bootstrap and verification.

use sqlx::PgPool;

/// Statements creating the schema; each is safe to run repeatedly
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS subscriptions (
        id UUID PRIMARY KEY,
        service_name TEXT NOT NULL,
        price INTEGER NOT NULL CHECK (price >= 0),
        user_id UUID NOT NULL,
        start_date DATE NOT NULL,
        end_date DATE,
        CHECK (end_date IS NULL OR end_date >= start_date)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_subscriptions_user ON subscriptions (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_subscriptions_period ON subscriptions (start_date, end_date)",
];

/// Tables the service cannot run without
const REQUIRED_TABLES: &[&str] = &["subscriptions"];

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Create tables and indexes that do not exist yet
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Database schema ensured");
    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    for table in REQUIRED_TABLES {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = current_schema() AND table_name = $1
            )
            "#,
        )
        .bind(*table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}
