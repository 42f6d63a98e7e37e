//! OTP record entity and its derived lifecycle status.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::contact::Contact;
use crate::errors::OtpError;

/// Maximum number of verification attempts allowed
pub const MAX_ATTEMPTS: u32 = 3;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for verification codes (5 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 5;

/// Lifecycle state of a record at a given instant.
///
/// Only `Verified` is stored; `Expired` and `AttemptsExhausted` are derived
/// from the record and the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpStatus {
    Pending,
    Verified,
    Expired,
    AttemptsExhausted,
}

impl OtpStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OtpStatus::Pending)
    }
}

/// One issued passcode bound to a single contact
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Unique identifier, handed to the client as `otp_id`
    pub id: Uuid,

    /// Email address or phone number the code was issued for
    pub contact: Contact,

    /// The numeric code
    pub code: String,

    /// Set once on successful verification
    pub is_verified: bool,

    /// Verification attempts consumed so far
    pub attempt_count: u32,

    pub created_at: DateTime<Utc>,

    /// Fixed at creation
    pub expires_at: DateTime<Utc>,

    pub verified_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for OtpRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpRecord")
            .field("id", &self.id)
            .field("contact", &self.contact.masked())
            .field("code", &"******")
            .field("is_verified", &self.is_verified)
            .field("attempt_count", &self.attempt_count)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .field("verified_at", &self.verified_at)
            .finish()
    }
}

impl OtpRecord {
    /// Creates a pending record valid for `ttl` from `now`
    pub fn new(contact: Contact, code: String, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            contact,
            code,
            is_verified: false,
            attempt_count: 0,
            created_at: now,
            expires_at: now + ttl,
            verified_at: None,
        }
    }

    /// Expiry is strict: the code is still usable at exactly `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn attempts_exhausted(&self, max_attempts: u32) -> bool {
        self.attempt_count >= max_attempts
    }

    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempt_count)
    }

    /// Current lifecycle state. Verified takes precedence over expiry, and
    /// expiry over attempt exhaustion.
    pub fn status_at(&self, now: DateTime<Utc>, max_attempts: u32) -> OtpStatus {
        if self.is_verified {
            OtpStatus::Verified
        } else if self.is_expired_at(now) {
            OtpStatus::Expired
        } else if self.attempts_exhausted(max_attempts) {
            OtpStatus::AttemptsExhausted
        } else {
            OtpStatus::Pending
        }
    }

    /// Fails with the error matching the record's terminal state, if any
    pub fn ensure_verifiable(&self, now: DateTime<Utc>, max_attempts: u32) -> Result<(), OtpError> {
        match self.status_at(now, max_attempts) {
            OtpStatus::Pending => Ok(()),
            OtpStatus::Verified => Err(OtpError::AlreadyVerified),
            OtpStatus::Expired => Err(OtpError::Expired),
            OtpStatus::AttemptsExhausted => Err(OtpError::AttemptsExceeded),
        }
    }

    /// Constant-time comparison against a submitted code
    pub fn matches(&self, candidate: &str) -> bool {
        if self.code.len() != candidate.len() {
            return false;
        }
        constant_time_eq(self.code.as_bytes(), candidate.as_bytes())
    }
}
