//! In-process URL store backed by a sharded concurrent map.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::errors::StoreError;
use crate::domain::repositories::UrlStore;

/// Non-persistent store for development and tests.
///
/// Records are keyed by short code. Inserts go through the map's entry API,
/// so a code can only be claimed once, and click increments run under the
/// entry's write guard.
#[derive(Debug)]
pub struct MemoryUrlStore {
    records: DashMap<String, UrlRecord>,
    next_id: AtomicI64,
}

impl MemoryUrlStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored records, expired ones included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for MemoryUrlStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlStore for MemoryUrlStore {
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|entry| entry.original_url == original_url)
            .min_by_key(|entry| entry.id)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlRecord>, StoreError> {
        Ok(self.records.get(short_code).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        match self.records.entry(new_record.short_code.clone()) {
            Entry::Occupied(occupied) => Err(StoreError::DuplicateCode(occupied.key().clone())),
            Entry::Vacant(vacant) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let record = new_record.into_record(id);
                vacant.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn increment_clicks(
        &self,
        short_code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UrlRecord>, StoreError> {
        let Some(mut entry) = self.records.get_mut(short_code) else {
            return Ok(None);
        };

        if entry.expires_at < now {
            return Ok(None);
        }

        entry.clicks += 1;
        entry.updated_at = now;
        Ok(Some(entry.value().clone()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
