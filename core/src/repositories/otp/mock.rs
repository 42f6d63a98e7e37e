//! In-memory implementation of OtpRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{Contact, OtpRecord};
use crate::errors::{DomainError, OtpError};

use super::r#trait::OtpRepository;

/// Mock OTP repository.
///
/// Every operation runs under a single lock, which gives the conditional
/// operations the same atomicity the SQL implementation gets from its
/// transactions.
#[derive(Clone, Default)]
pub struct MockOtpRepository {
    records: Arc<RwLock<HashMap<Uuid, OtpRecord>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockOtpRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a storage error
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::storage("OTP store unavailable"));
        }
        Ok(())
    }

    fn count_matching(
        records: &HashMap<Uuid, OtpRecord>,
        contact: &Contact,
        since: DateTime<Utc>,
    ) -> u64 {
        records
            .values()
            .filter(|r| &r.contact == contact && r.created_at > since)
            .count() as u64
    }
}

#[async_trait]
impl OtpRepository for MockOtpRepository {
    async fn insert(&self, record: &OtpRecord) -> Result<(), DomainError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(DomainError::storage("Duplicate OTP id"));
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn insert_within_limit(
        &self,
        record: &OtpRecord,
        since: DateTime<Utc>,
        max_records: u32,
    ) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        if Self::count_matching(&records, &record.contact, since) >= u64::from(max_records) {
            return Ok(false);
        }
        if records.contains_key(&record.id) {
            return Err(DomainError::storage("Duplicate OTP id"));
        }
        records.insert(record.id, record.clone());
        Ok(true)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OtpRecord>, DomainError> {
        self.check_available()?;
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn save(&self, record: &OtpRecord) -> Result<(), DomainError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        match records.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(OtpError::NotFound.into()),
        }
    }

    async fn increment_attempts(
        &self,
        id: Uuid,
        max_attempts: u32,
    ) -> Result<Option<OtpRecord>, DomainError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(record) if !record.is_verified && record.attempt_count < max_attempts => {
                record.attempt_count += 1;
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn mark_verified(
        &self,
        id: Uuid,
        verified_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(record) if !record.is_verified => {
                record.is_verified = true;
                record.verified_at = Some(verified_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_since(&self, contact: &Contact, since: DateTime<Utc>) -> Result<u64, DomainError> {
        self.check_available()?;
        let records = self.records.read().await;
        Ok(Self::count_matching(&records, contact, since))
    }

    async fn find_by_contact(&self, contact: &Contact) -> Result<Vec<OtpRecord>, DomainError> {
        self.check_available()?;
        let records = self.records.read().await;
        let mut matching: Vec<OtpRecord> = records
            .values()
            .filter(|r| &r.contact == contact)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }
}
