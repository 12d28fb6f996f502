//! URL record entity representing a short code mapping.

use chrono::{DateTime, Utc};

/// A persisted mapping from a short code to a canonical URL.
///
/// Records are never deleted; expiration is evaluated at query time
/// against `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub clicks: i64,
    pub expires_at: DateTime<Utc>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Returns true once `now` has passed `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Returns true if the record has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Input data for inserting a new record.
///
/// The store assigns `id`, starts `clicks` at zero and sets
/// `updated_at` to `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub original_url: String,
    pub short_code: String,
    pub expires_at: DateTime<Utc>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl NewUrlRecord {
    /// Materializes the record as the store persists it.
    pub fn into_record(self, id: i64) -> UrlRecord {
        UrlRecord {
            id,
            original_url: self.original_url,
            short_code: self.short_code,
            clicks: 0,
            expires_at: self.expires_at,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_record(expires_at: DateTime<Utc>) -> NewUrlRecord {
        NewUrlRecord {
            original_url: "https://example.com".to_string(),
            short_code: "abc123".to_string(),
            expires_at,
            created_by: "anonymous".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_into_record_starts_with_zero_clicks() {
        let new = new_record(Utc::now() + Duration::days(1));
        let created_at = new.created_at;

        let record = new.into_record(7);

        assert_eq!(record.id, 7);
        assert_eq!(record.clicks, 0);
        assert_eq!(record.short_code, "abc123");
        assert_eq!(record.updated_at, created_at);
    }

    #[test]
    fn test_record_is_live_before_expiry() {
        let record = new_record(Utc::now() + Duration::hours(1)).into_record(1);
        assert!(!record.is_expired());
    }

    #[test]
    fn test_record_is_expired_after_expiry() {
        let record = new_record(Utc::now() - Duration::seconds(1)).into_record(1);
        assert!(record.is_expired());
    }

    #[test]
    fn test_record_is_live_at_exact_expiry_instant() {
        let expires_at = Utc::now();
        let record = new_record(expires_at).into_record(1);

        assert!(!record.is_expired_at(expires_at));
        assert!(record.is_expired_at(expires_at + Duration::milliseconds(1)));
    }
}
