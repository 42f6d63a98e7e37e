//! OTP repository trait defining the interface for OTP record persistence.
//!
//! Records are never deleted through this interface: their history feeds
//! the per-contact rate limit. The conditional operations
//! (`insert_within_limit`, `increment_attempts`, `mark_verified`) must be
//! atomic with respect to concurrent callers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{Contact, OtpRecord};
use crate::errors::DomainError;

/// Repository trait for OTP record persistence operations
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Persist a new record unconditionally
    async fn insert(&self, record: &OtpRecord) -> Result<(), DomainError>;

    /// Persist a new record only if fewer than `max_records` records exist
    /// for its contact with `created_at > since`.
    ///
    /// # Returns
    /// * `Ok(true)` - Record inserted
    /// * `Ok(false)` - Limit reached, nothing written
    /// * `Err(DomainError)` - Storage failure
    async fn insert_within_limit(
        &self,
        record: &OtpRecord,
        since: DateTime<Utc>,
        max_records: u32,
    ) -> Result<bool, DomainError>;

    /// Find a record by its identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OtpRecord>, DomainError>;

    /// Overwrite the mutable fields of an existing record
    async fn save(&self, record: &OtpRecord) -> Result<(), DomainError>;

    /// Atomically consume one verification attempt.
    ///
    /// Increments `attempt_count` only while the record is unverified and
    /// below `max_attempts`.
    ///
    /// # Returns
    /// * `Ok(Some(record))` - The record after the increment
    /// * `Ok(None)` - Unknown id, already verified, or no attempts left
    async fn increment_attempts(
        &self,
        id: Uuid,
        max_attempts: u32,
    ) -> Result<Option<OtpRecord>, DomainError>;

    /// Flip the verified flag exactly once.
    ///
    /// # Returns
    /// * `Ok(true)` - This caller verified the record
    /// * `Ok(false)` - Unknown id or already verified
    async fn mark_verified(
        &self,
        id: Uuid,
        verified_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Count records for a contact created strictly after `since`
    async fn count_since(&self, contact: &Contact, since: DateTime<Utc>) -> Result<u64, DomainError>;

    /// All records for a contact, newest first
    async fn find_by_contact(&self, contact: &Contact) -> Result<Vec<OtpRecord>, DomainError>;
}
