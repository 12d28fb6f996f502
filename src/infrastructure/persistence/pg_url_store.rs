//! PostgreSQL implementation of the URL store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::errors::StoreError;
use crate::domain::repositories::UrlStore;
use crate::utils::db_error::is_unique_violation_on_code;

const RECORD_COLUMNS: &str =
    "id, original_url, short_code, clicks, expires_at, created_by, created_at, updated_at";

#[derive(FromRow)]
struct UrlRow {
    id: i64,
    original_url: String,
    short_code: String,
    clicks: i64,
    expires_at: DateTime<Utc>,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UrlRow> for UrlRecord {
    fn from(row: UrlRow) -> Self {
        UrlRecord {
            id: row.id,
            original_url: row.original_url,
            short_code: row.short_code,
            clicks: row.clicks,
            expires_at: row.expires_at,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL store for URL records.
///
/// Code uniqueness is enforced by the `urls_short_code_key` constraint and
/// clicks are incremented with a single `UPDATE ... RETURNING`.
pub struct PgUrlStore {
    pool: Arc<PgPool>,
}

impl PgUrlStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlStore for PgUrlStore {
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM urls WHERE original_url = $1 ORDER BY id LIMIT 1"
        ))
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM urls WHERE short_code = $1"
        ))
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            r#"
            INSERT INTO urls (original_url, short_code, clicks, expires_at, created_by, created_at, updated_at)
            VALUES ($1, $2, 0, $3, $4, $5, $5)
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(&new_record.original_url)
        .bind(&new_record.short_code)
        .bind(new_record.expires_at)
        .bind(&new_record.created_by)
        .bind(new_record.created_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on_code(&e) {
                StoreError::DuplicateCode(new_record.short_code.clone())
            } else {
                StoreError::Database(e)
            }
        })?;

        Ok(row.into())
    }

    async fn increment_clicks(
        &self,
        short_code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            r#"
            UPDATE urls
            SET clicks = clicks + 1, updated_at = $2
            WHERE short_code = $1 AND expires_at >= $2
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(short_code)
        .bind(now)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
