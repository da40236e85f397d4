//! Database access layer for scorecap-gateway
//!
//! One SQLite file holds the `scores` table. Concurrent writers are
//! serialized by SQLite itself (WAL journal + busy timeout).

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;
use std::time::Duration;

mod scores;
pub use scores::{Score, ScoreStore, StorageError};

/// Connections kept open for concurrent uploads and reads
const POOL_SIZE: u32 = 8;

/// How long a writer waits on a locked database before failing
const BUSY_TIMEOUT_MS: u64 = 5000;

/// Open (creating if needed) the scores database and ensure the schema
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::debug!("Connecting to database: {}", db_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(POOL_SIZE)
        .acquire_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))
        .connect_with(
            SqliteConnectOptions::new()
                .filename(db_path)
                .busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true),
        )
        .await
        .context("Failed to open scores database")?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the scores table if it doesn't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    // AUTOINCREMENT keeps ids of deleted rows from being handed out again
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scores (
            id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            scenario TEXT NOT NULL CHECK (length(scenario) > 0),
            score INTEGER NOT NULL,
            processed_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create scores table")?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_scores_processed_at ON scores (processed_at DESC, id DESC)",
    )
    .execute(pool)
    .await
    .context("Failed to create scores index")?;

    tracing::info!("Database tables initialized (scores)");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_database_file_and_schema() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("scores.db");

        let pool = init_database_pool(&db_path).await.unwrap();
        assert!(db_path.exists());

        let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('scores')")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(columns, vec!["id", "scenario", "score", "processed_at"]);
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("scores.db");

        let pool = init_database_pool(&db_path).await.unwrap();
        init_tables(&pool).await.unwrap();
        pool.close().await;

        // Reopening an existing database keeps working
        init_database_pool(&db_path).await.unwrap();
    }
}
