//! Short code allocation and resolution service.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::errors::{RegistryError, StoreError};
use crate::domain::repositories::UrlStore;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_code, seed_with_entropy};

/// Attribution stored on records created without an authenticated caller.
pub const ANONYMOUS_CREATOR: &str = "anonymous";

/// Tunables for [`UrlRegistry`].
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    /// Number of characters kept from a generated code.
    pub code_length: usize,
    /// Lifetime of a newly created record.
    pub default_expiry: chrono::Duration,
    /// Candidates tried before giving up with
    /// [`RegistryError::CodeGenerationExhausted`].
    pub max_generation_attempts: usize,
    /// Deadline applied to each registry operation; `None` waits indefinitely.
    pub operation_timeout: Option<Duration>,
    /// Value written to `created_by`.
    pub created_by: String,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            default_expiry: chrono::Duration::days(365),
            max_generation_attempts: 10,
            operation_timeout: None,
            created_by: ANONYMOUS_CREATOR.to_string(),
        }
    }
}

/// Owns the mapping between canonical URLs and short codes.
///
/// All uniqueness and click-count guarantees are delegated to the store:
/// the registry performs best-effort pre-insert checks and relies on the
/// store's unique index and atomic increment as the authority.
pub struct UrlRegistry<S: UrlStore + ?Sized> {
    store: Arc<S>,
    settings: RegistrySettings,
}

impl<S: UrlStore + ?Sized> UrlRegistry<S> {
    /// Creates a registry on top of a shared store handle.
    pub fn new(store: Arc<S>, settings: RegistrySettings) -> Self {
        Self { store, settings }
    }

    /// Returns the record for `original_url`, creating one if needed.
    ///
    /// # Deduplication
    ///
    /// An existing record for the same canonical URL is returned unchanged,
    /// even when a custom code is supplied.
    ///
    /// # Code Selection
    ///
    /// - A non-empty `custom_code` is adopted as-is unless it is already taken
    /// - Otherwise a code is derived from the URL and the current instant,
    ///   retrying with extra entropy on collision up to the configured ceiling
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CodeInUse`] if the custom code is taken, including
    /// when a concurrent writer claims it between the check and the insert.
    /// Returns [`RegistryError::CodeGenerationExhausted`] when every candidate collided.
    /// Returns [`RegistryError::DeadlineExceeded`] or [`RegistryError::Store`] on
    /// store failures.
    pub async fn shorten(
        &self,
        original_url: &str,
        custom_code: Option<&str>,
    ) -> Result<UrlRecord, RegistryError> {
        self.with_deadline(self.shorten_unbounded(original_url, custom_code))
            .await
    }

    /// Resolves a short code to its live record, counting one click.
    ///
    /// The returned `clicks` is the value produced by the store's atomic
    /// increment.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for unknown codes and
    /// [`RegistryError::Expired`] for lapsed records; neither touches the counter.
    pub async fn resolve(&self, short_code: &str) -> Result<UrlRecord, RegistryError> {
        self.with_deadline(self.resolve_unbounded(short_code)).await
    }

    /// Fetches a record without counting a click or checking expiry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for unknown codes.
    pub async fn lookup(&self, short_code: &str) -> Result<UrlRecord, RegistryError> {
        self.with_deadline(self.lookup_unbounded(short_code)).await
    }

    /// Checks that the underlying store is reachable.
    ///
    /// # Errors
    ///
    /// Returns the store failure or [`RegistryError::DeadlineExceeded`].
    pub async fn check_store(&self) -> Result<(), RegistryError> {
        self.with_deadline(self.ping_unbounded()).await
    }

    async fn shorten_unbounded(
        &self,
        original_url: &str,
        custom_code: Option<&str>,
    ) -> Result<UrlRecord, RegistryError> {
        if let Some(existing) = self.store.find_by_original_url(original_url).await? {
            debug!(code = %existing.short_code, "URL already shortened");
            return Ok(existing);
        }

        match custom_code.filter(|code| !code.is_empty()) {
            Some(code) => self.register_custom_code(original_url, code).await,
            None => self.register_generated_code(original_url).await,
        }
    }

    async fn register_custom_code(
        &self,
        original_url: &str,
        code: &str,
    ) -> Result<UrlRecord, RegistryError> {
        if self.store.find_by_code(code).await?.is_some() {
            return Err(RegistryError::CodeInUse(code.to_string()));
        }

        match self
            .store
            .insert(self.new_record(original_url, code.to_string()))
            .await
        {
            Ok(record) => {
                info!(code = %record.short_code, "Registered custom short code");
                Ok(record)
            }
            Err(StoreError::DuplicateCode(code)) => Err(RegistryError::CodeInUse(code)),
            Err(e) => Err(e.into()),
        }
    }

    async fn register_generated_code(&self, original_url: &str) -> Result<UrlRecord, RegistryError> {
        let attempts = self.settings.max_generation_attempts;
        let mut seed = original_url.to_string();

        for attempt in 1..=attempts {
            let code = generate_code(&seed, Utc::now(), self.settings.code_length);

            if self.store.find_by_code(&code).await?.is_some() {
                warn!(%code, attempt, "Generated short code collides with an existing record");
            } else {
                match self.store.insert(self.new_record(original_url, code)).await {
                    Ok(record) => {
                        info!(code = %record.short_code, attempt, "Registered generated short code");
                        return Ok(record);
                    }
                    Err(StoreError::DuplicateCode(code)) => {
                        warn!(%code, attempt, "Generated short code was claimed concurrently");

                        if let Some(existing) =
                            self.store.find_by_original_url(original_url).await?
                        {
                            debug!(code = %existing.short_code, "URL was shortened concurrently");
                            return Ok(existing);
                        }
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            seed = seed_with_entropy(original_url);
        }

        Err(RegistryError::CodeGenerationExhausted { attempts })
    }

    async fn resolve_unbounded(&self, short_code: &str) -> Result<UrlRecord, RegistryError> {
        let record = self
            .store
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| RegistryError::NotFound(short_code.to_string()))?;

        let now = Utc::now();
        if record.is_expired_at(now) {
            debug!(code = %short_code, expires_at = %record.expires_at, "Short code expired");
            return Err(RegistryError::Expired(short_code.to_string()));
        }

        // The increment re-checks expiry, so a record lapsing in between is
        // reported as expired rather than counted.
        self.store
            .increment_clicks(short_code, now)
            .await?
            .ok_or_else(|| RegistryError::Expired(short_code.to_string()))
    }

    async fn lookup_unbounded(&self, short_code: &str) -> Result<UrlRecord, RegistryError> {
        self.store
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| RegistryError::NotFound(short_code.to_string()))
    }

    async fn ping_unbounded(&self) -> Result<(), RegistryError> {
        self.store.ping().await?;
        Ok(())
    }

    fn new_record(&self, original_url: &str, short_code: String) -> NewUrlRecord {
        let now = Utc::now();
        NewUrlRecord {
            original_url: original_url.to_string(),
            short_code,
            expires_at: now + self.settings.default_expiry,
            created_by: self.settings.created_by.clone(),
            created_at: now,
        }
    }

    async fn with_deadline<T, F>(&self, operation: F) -> Result<T, RegistryError>
    where
        F: Future<Output = Result<T, RegistryError>>,
    {
        match self.settings.operation_timeout {
            Some(limit) => tokio::time::timeout(limit, operation)
                .await
                .map_err(|_| RegistryError::DeadlineExceeded(limit))?,
            None => operation.await,
        }
    }
}
