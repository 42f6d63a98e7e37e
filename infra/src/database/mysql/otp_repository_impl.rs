//! MySQL implementation of the OtpRepository trait.
//!
//! The conditional operations are pushed down to single guarded statements
//! or short transactions so that concurrent API workers cannot double-spend
//! an attempt, verify a code twice, or exceed the issuance limit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use otp_core::domain::entities::{Contact, OtpRecord};
use otp_core::errors::{DomainError, OtpError};
use otp_core::repositories::OtpRepository;

use super::{contact_column, contact_from_columns, is_deadlock, storage_error};

/// Attempts at the locked count-and-insert before giving up on deadlocks
const INSERT_RETRIES: usize = 3;

const SELECT_COLUMNS: &str = r#"
    SELECT id, email, phone, otp_code, is_verified, attempt_count,
           created_at, expires_at, verified_at
    FROM otp_records
"#;

/// MySQL implementation of OtpRepository
pub struct MySqlOtpRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlOtpRepository {
    /// Create a new MySQL OTP repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to OtpRecord entity
    fn row_to_otp(row: &MySqlRow) -> Result<OtpRecord, DomainError> {
        let column = |name: &'static str| {
            move |e: sqlx::Error| DomainError::storage(format!("Failed to get {}: {}", name, e))
        };

        let id: String = row.try_get("id").map_err(column("id"))?;
        let email: Option<String> = row.try_get("email").map_err(column("email"))?;
        let phone: Option<String> = row.try_get("phone").map_err(column("phone"))?;

        Ok(OtpRecord {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::storage(format!("Invalid UUID: {}", e)))?,
            contact: contact_from_columns(email, phone)?,
            code: row.try_get("otp_code").map_err(column("otp_code"))?,
            is_verified: row.try_get("is_verified").map_err(column("is_verified"))?,
            attempt_count: row
                .try_get("attempt_count")
                .map_err(column("attempt_count"))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(column("created_at"))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(column("expires_at"))?,
            verified_at: row.try_get("verified_at").map_err(column("verified_at"))?,
        })
    }

    async fn insert_with<'e, E>(executor: E, record: &OtpRecord) -> Result<(), sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = sqlx::MySql>,
    {
        let query = r#"
            INSERT INTO otp_records (
                id, email, phone, otp_code, is_verified, attempt_count,
                created_at, expires_at, verified_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(record.contact.as_email())
            .bind(record.contact.as_phone())
            .bind(&record.code)
            .bind(record.is_verified)
            .bind(record.attempt_count)
            .bind(record.created_at)
            .bind(record.expires_at)
            .bind(record.verified_at)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// One locked count-then-insert transaction
    async fn try_insert_within_limit(
        &self,
        record: &OtpRecord,
        since: DateTime<Utc>,
        max_records: u32,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // Locks the scanned (contact, created_at) index range, so a concurrent
        // issuer for the same contact waits here until this one commits.
        let query = format!(
            "SELECT COUNT(*) FROM otp_records WHERE {} = ? AND created_at > ? FOR UPDATE",
            contact_column(&record.contact)
        );
        let recent: i64 = sqlx::query_scalar(&query)
            .bind(record.contact.value())
            .bind(since)
            .fetch_one(&mut *tx)
            .await?;

        if recent >= i64::from(max_records) {
            tx.rollback().await?;
            return Ok(false);
        }

        Self::insert_with(&mut *tx, record).await?;
        tx.commit().await?;
        Ok(true)
    }
}

#[async_trait]
impl OtpRepository for MySqlOtpRepository {
    async fn insert(&self, record: &OtpRecord) -> Result<(), DomainError> {
        Self::insert_with(&self.pool, record)
            .await
            .map_err(storage_error("Failed to insert OTP record"))
    }

    async fn insert_within_limit(
        &self,
        record: &OtpRecord,
        since: DateTime<Utc>,
        max_records: u32,
    ) -> Result<bool, DomainError> {
        let mut attempt = 1;
        loop {
            match self.try_insert_within_limit(record, since, max_records).await {
                Ok(inserted) => return Ok(inserted),
                Err(e) if is_deadlock(&e) && attempt < INSERT_RETRIES => {
                    tracing::debug!(
                        otp_id = %record.id,
                        attempt,
                        "Deadlock while issuing OTP, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(storage_error("Failed to insert OTP record")(e)),
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OtpRecord>, DomainError> {
        let query = format!("{} WHERE id = ? LIMIT 1", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Failed to load OTP record"))?;

        row.as_ref().map(Self::row_to_otp).transpose()
    }

    async fn save(&self, record: &OtpRecord) -> Result<(), DomainError> {
        let query = r#"
            UPDATE otp_records SET
                is_verified = ?,
                attempt_count = ?,
                verified_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(record.is_verified)
            .bind(record.attempt_count)
            .bind(record.verified_at)
            .bind(record.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_error("Failed to update OTP record"))?;

        // MySQL reports changed rows, so zero can also mean "no difference"
        if result.rows_affected() == 0 && self.find_by_id(record.id).await?.is_none() {
            return Err(OtpError::NotFound.into());
        }
        Ok(())
    }

    async fn increment_attempts(
        &self,
        id: Uuid,
        max_attempts: u32,
    ) -> Result<Option<OtpRecord>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage_error("Failed to begin transaction"))?;

        let result = sqlx::query(
            r#"
            UPDATE otp_records
            SET attempt_count = attempt_count + 1
            WHERE id = ? AND is_verified = FALSE AND attempt_count < ?
            "#,
        )
        .bind(id.to_string())
        .bind(max_attempts)
        .execute(&mut *tx)
        .await
        .map_err(storage_error("Failed to increment attempt count"))?;

        if result.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(storage_error("Failed to roll back transaction"))?;
            return Ok(None);
        }

        // Same transaction: the row lock from the UPDATE is still held
        let query = format!("{} WHERE id = ?", SELECT_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_one(&mut *tx)
            .await
            .map_err(storage_error("Failed to load OTP record"))?;
        let record = Self::row_to_otp(&row)?;

        tx.commit()
            .await
            .map_err(storage_error("Failed to commit attempt increment"))?;

        tracing::debug!(
            otp_id = %id,
            attempt_count = record.attempt_count,
            "Incremented OTP attempt count"
        );
        Ok(Some(record))
    }

    async fn mark_verified(
        &self,
        id: Uuid,
        verified_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE otp_records
            SET is_verified = TRUE, verified_at = ?
            WHERE id = ? AND is_verified = FALSE
            "#,
        )
        .bind(verified_at)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(storage_error("Failed to mark OTP verified"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn count_since(&self, contact: &Contact, since: DateTime<Utc>) -> Result<u64, DomainError> {
        let query = format!(
            "SELECT COUNT(*) FROM otp_records WHERE {} = ? AND created_at > ?",
            contact_column(contact)
        );

        let count: i64 = sqlx::query_scalar(&query)
            .bind(contact.value())
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("Failed to count recent OTP records"))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn find_by_contact(&self, contact: &Contact) -> Result<Vec<OtpRecord>, DomainError> {
        let query = format!(
            "{} WHERE {} = ? ORDER BY created_at DESC",
            SELECT_COLUMNS,
            contact_column(contact)
        );

        let rows = sqlx::query(&query)
            .bind(contact.value())
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Failed to load OTP records"))?;

        rows.iter().map(Self::row_to_otp).collect()
    }
}
