//! Repository trait for URL record persistence.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::errors::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Store interface backing the code registry.
///
/// Implementations must enforce `short_code` uniqueness themselves and
/// perform the click increment as a single atomic update.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryUrlStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Finds the first record (lowest id) whose `original_url` equals the input.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on backend failures.
    async fn find_by_original_url(&self, original_url: &str)
    -> Result<Option<UrlRecord>, StoreError>;

    /// Finds a record by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on backend failures.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Inserts a new record with zero clicks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateCode`] if the short code is taken.
    /// Returns [`StoreError::Database`] on other backend failures.
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError>;

    /// Atomically increments `clicks` and sets `updated_at = now` on a live record.
    ///
    /// Returns the record as it stands after the increment, or `None` when no
    /// record with this code has `expires_at >= now`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on backend failures.
    async fn increment_clicks(
        &self,
        short_code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UrlRecord>, StoreError>;

    /// Verifies the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the backend cannot be reached.
    async fn ping(&self) -> Result<(), StoreError>;
}
