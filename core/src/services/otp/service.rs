//! Main OTP lifecycle service implementation

use std::sync::Arc;

use otp_shared::utils::validation::validators;
use uuid::Uuid;

use crate::domain::entities::{Contact, OtpRecord};
use crate::errors::{DomainError, DomainResult, OtpError, ValidationError};
use crate::repositories::{OtpRepository, UserRepository};

use super::clock::{Clock, SystemClock};
use super::config::OtpServiceConfig;
use super::generator::generate_code;
use super::traits::NotifierTrait;
use super::types::{IssuedOtp, NotificationStatus, VerifiedContact};

/// OTP service: issues, verifies and resends one-time passcodes.
///
/// Holds no mutable state of its own. Race-freedom for the attempt counter,
/// the single-use flip and the rate limit comes from the repository's
/// conditional operations, so one instance can be shared across workers.
pub struct OtpService<R: OtpRepository, U: UserRepository> {
    /// OTP record storage
    otp_repository: Arc<R>,
    /// User storage, written on successful verification
    user_repository: Arc<U>,
    /// SMS channel; `None` when no provider is configured
    notifier: Option<Arc<dyn NotifierTrait>>,
    /// Time source
    clock: Arc<dyn Clock>,
    /// Service configuration
    config: OtpServiceConfig,
}

impl<R: OtpRepository, U: UserRepository> OtpService<R, U> {
    /// Create a new OTP service using the system clock and no notifier
    ///
    /// # Arguments
    ///
    /// * `otp_repository` - OTP record repository implementation
    /// * `user_repository` - User repository implementation
    /// * `config` - Service configuration
    pub fn new(otp_repository: Arc<R>, user_repository: Arc<U>, config: OtpServiceConfig) -> Self {
        Self {
            otp_repository,
            user_repository,
            notifier: None,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Attach an SMS notifier
    pub fn with_notifier(mut self, notifier: Option<Arc<dyn NotifierTrait>>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &OtpServiceConfig {
        &self.config
    }

    /// Whether an SMS notifier is attached
    pub fn has_notifier(&self) -> bool {
        self.notifier.is_some()
    }

    /// Issue a new code for a contact
    ///
    /// This method:
    /// 1. Rejects the request if the contact already hit the rate limit
    /// 2. Generates a new code from the OS CSPRNG
    /// 3. Stores the record, re-checking the limit atomically with the insert
    /// 4. Sends the code by SMS for phone contacts (best effort)
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedOtp)` - Id, expiry, delivery status and, in non-production, the code
    /// * `Err(DomainError)` - `InvalidInput`, `RateLimited`, `RandomnessUnavailable` or a storage failure
    pub async fn generate(&self, contact: Contact) -> DomainResult<IssuedOtp> {
        self.issue(contact, "otp_generated").await
    }

    /// Issue a fresh code for the contact of an existing record
    ///
    /// The existing record is left untouched and stays verifiable until it
    /// expires. The new request counts toward the same rate limit.
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedOtp)` - The newly issued code
    /// * `Err(DomainError)` - `NotFound`, `AlreadyVerified`, `RateLimited`, or infrastructure failure
    pub async fn resend(&self, otp_id: &str) -> DomainResult<IssuedOtp> {
        let id = parse_otp_id(otp_id)?;
        let previous = self
            .otp_repository
            .find_by_id(id)
            .await?
            .ok_or(OtpError::NotFound)?;

        if previous.is_verified {
            tracing::info!(
                otp_id = %id,
                event = "otp_resend_rejected",
                "Resend requested for an already verified OTP"
            );
            return Err(OtpError::AlreadyVerified.into());
        }

        self.issue(previous.contact, "otp_resent").await
    }

    /// Verify a submitted code
    ///
    /// Checks run in order: already verified, expired, attempts exhausted.
    /// A passing record has one attempt consumed and persisted before the
    /// code is compared in constant time.
    ///
    /// # Returns
    ///
    /// * `Ok(VerifiedContact)` - The verified contact and its user id
    /// * `Err(DomainError)` - One of `NotFound`, `AlreadyVerified`, `Expired`,
    ///   `AttemptsExceeded`, `CodeMismatch`, or a storage failure
    pub async fn verify(&self, otp_id: &str, code: &str) -> DomainResult<VerifiedContact> {
        let code = code.trim();
        if code.len() != self.config.code_length || !validators::is_numeric(code) {
            return Err(ValidationError::InvalidCodeFormat {
                expected: self.config.code_length,
            }
            .into());
        }

        let id = parse_otp_id(otp_id)?;
        let max_attempts = self.config.max_attempts;
        let now = self.clock.now();

        let record = self
            .otp_repository
            .find_by_id(id)
            .await?
            .ok_or(OtpError::NotFound)?;

        if let Err(err) = record.ensure_verifiable(now, max_attempts) {
            tracing::warn!(
                otp_id = %id,
                contact = %record.contact,
                error = %err,
                event = "otp_verification_rejected",
                "OTP is no longer verifiable"
            );
            return Err(err.into());
        }

        let record = match self.otp_repository.increment_attempts(id, max_attempts).await? {
            Some(updated) => updated,
            None => {
                // Lost a race: another request verified or used the last attempt
                let current = self
                    .otp_repository
                    .find_by_id(id)
                    .await?
                    .ok_or(OtpError::NotFound)?;
                current.ensure_verifiable(now, max_attempts)?;
                return Err(OtpError::AttemptsExceeded.into());
            }
        };

        if !record.matches(code) {
            let remaining_attempts = record.remaining_attempts(max_attempts);
            tracing::warn!(
                otp_id = %id,
                contact = %record.contact,
                remaining_attempts = remaining_attempts,
                event = "otp_verification_failed",
                "OTP code mismatch"
            );
            return Err(OtpError::CodeMismatch { remaining_attempts }.into());
        }

        if !self.otp_repository.mark_verified(id, now).await? {
            tracing::warn!(
                otp_id = %id,
                event = "otp_verification_race",
                "OTP was verified by a concurrent request"
            );
            return Err(OtpError::AlreadyVerified.into());
        }

        let user = self
            .user_repository
            .upsert_verified(&record.contact, now)
            .await?;

        tracing::info!(
            otp_id = %id,
            user_id = %user.id,
            contact = %record.contact,
            event = "otp_verified",
            "OTP verified successfully"
        );

        Ok(VerifiedContact {
            otp_id: id,
            user_id: user.id,
            email: user.email,
            phone: user.phone,
            verified_at: now,
        })
    }

    async fn issue(&self, contact: Contact, event: &'static str) -> DomainResult<IssuedOtp> {
        contact.validate()?;

        let now = self.clock.now();
        let since = now - self.config.rate_limit_window();
        let limit = self.config.rate_limit_max_requests;

        let recent = self.otp_repository.count_since(&contact, since).await?;
        if recent >= u64::from(limit) {
            return Err(self.rate_limited(&contact, recent));
        }

        let code = generate_code(self.config.code_length)?;
        let record = OtpRecord::new(contact, code, now, self.config.ttl());

        if !self
            .otp_repository
            .insert_within_limit(&record, since, limit)
            .await?
        {
            return Err(self.rate_limited(&record.contact, u64::from(limit)));
        }

        let notification = self.notify(&record).await;

        tracing::info!(
            otp_id = %record.id,
            contact = %record.contact,
            expires_at = %record.expires_at,
            notification = %notification,
            event = event,
            "Issued OTP"
        );
        if self.config.expose_code {
            tracing::debug!(otp_id = %record.id, otp_code = %record.code, "Development OTP code");
        }

        Ok(IssuedOtp {
            otp_id: record.id,
            expires_at: record.expires_at,
            notification,
            code: self.config.expose_code.then(|| record.code.clone()),
            contact: record.contact,
        })
    }

    /// Deliver the code by SMS. Failures are reported in the status only.
    async fn notify(&self, record: &OtpRecord) -> NotificationStatus {
        let Some(phone) = record.contact.as_phone() else {
            return NotificationStatus::NotApplicable;
        };
        let Some(notifier) = &self.notifier else {
            tracing::warn!(
                otp_id = %record.id,
                event = "notification_not_configured",
                "SMS notifier not configured; code was not delivered"
            );
            return NotificationStatus::NotConfigured;
        };

        let body = sms_body(&record.code, self.config.code_expiration_minutes);
        match notifier.send_message(phone, &body).await {
            Ok(message_id) => {
                tracing::info!(
                    otp_id = %record.id,
                    provider = notifier.provider_name(),
                    message_id = %message_id,
                    event = "notification_sent",
                    "OTP SMS sent"
                );
                NotificationStatus::Sent
            }
            Err(e) => {
                tracing::error!(
                    otp_id = %record.id,
                    provider = notifier.provider_name(),
                    contact = %record.contact,
                    error = %e,
                    event = "notification_failed",
                    "Failed to send OTP SMS"
                );
                NotificationStatus::Failed
            }
        }
    }

    fn rate_limited(&self, contact: &Contact, recent: u64) -> DomainError {
        tracing::warn!(
            contact = %contact,
            recent_requests = recent,
            limit = self.config.rate_limit_max_requests,
            event = "otp_rate_limited",
            "OTP request rate limit exceeded"
        );
        OtpError::RateLimited {
            window_minutes: self.config.rate_limit_window_minutes,
        }
        .into()
    }
}

/// Unparsable ids cannot exist in the store
fn parse_otp_id(otp_id: &str) -> Result<Uuid, OtpError> {
    Uuid::parse_str(otp_id.trim()).map_err(|_| OtpError::NotFound)
}

/// SMS text carrying the code
pub(crate) fn sms_body(code: &str, ttl_minutes: i64) -> String {
    format!(
        "Your OTP verification code is: {}\n\nThis code will expire in {} minutes.\n\nDo not share this code with anyone.",
        code, ttl_minutes
    )
}
