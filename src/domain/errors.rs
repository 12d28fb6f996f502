//! Error types raised by the store and the code registry.

use std::time::Duration;

/// Failures reported by a [`crate::domain::repositories::UrlStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The unique index on `short_code` rejected an insert.
    #[error("short code '{0}' already exists")]
    DuplicateCode(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Failures of the code registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A custom code is already registered, possibly for another URL.
    #[error("short code '{0}' is already in use")]
    CodeInUse(String),

    #[error("short code '{0}' not found")]
    NotFound(String),

    #[error("short code '{0}' has expired")]
    Expired(String),

    #[error("no free short code found after {attempts} attempts")]
    CodeGenerationExhausted { attempts: usize },

    #[error("store operation exceeded deadline of {0:?}")]
    DeadlineExceeded(Duration),

    #[error(transparent)]
    Store(#[from] StoreError),
}
