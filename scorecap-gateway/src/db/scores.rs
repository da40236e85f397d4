//! Score rows: create, list, update, delete

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;

/// Score store errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying SQLite failure (constraint, I/O, closed pool)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Row rejected before reaching the database
    #[error("Invalid score: {0}")]
    Invalid(String),
}

/// A persisted scenario measurement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Score {
    #[serde(rename = "ID")]
    pub id: i64,
    pub scenario: String,
    pub score: i64,
    pub processed_at: DateTime<Utc>,
}

/// Handle to the `scores` table
///
/// Cheap to clone; all clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    pool: SqlitePool,
}

impl ScoreStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a new row stamped with the current time; returns its id
    pub async fn create(&self, scenario: &str, score: i64) -> Result<i64, StorageError> {
        validate_scenario(scenario)?;

        let result = sqlx::query("INSERT INTO scores (scenario, score, processed_at) VALUES (?, ?, ?)")
            .bind(scenario)
            .bind(score)
            .bind(timestamp(Utc::now()))
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// All rows, most recently processed first
    pub async fn list(&self) -> Result<Vec<Score>, StorageError> {
        let scores = sqlx::query_as::<_, Score>(
            "SELECT id, scenario, score, processed_at FROM scores ORDER BY processed_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(scores)
    }

    /// Overwrite scenario and score of row `id`; `processed_at` is untouched
    ///
    /// Returns the number of rows changed. An unknown id changes nothing and
    /// is not an error.
    pub async fn update(&self, id: i64, scenario: &str, score: i64) -> Result<u64, StorageError> {
        validate_scenario(scenario)?;

        let result = sqlx::query("UPDATE scores SET scenario = ?, score = ? WHERE id = ?")
            .bind(scenario)
            .bind(score)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Remove row `id`; returns the number of rows removed
    pub async fn delete(&self, id: i64) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM scores WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

fn validate_scenario(scenario: &str) -> Result<(), StorageError> {
    if scenario.trim().is_empty() {
        return Err(StorageError::Invalid("scenario must not be empty".to_string()));
    }
    Ok(())
}

/// Fixed-width UTC text so lexical order in SQLite matches time order
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
