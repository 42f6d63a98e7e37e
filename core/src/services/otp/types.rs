//! Types for OTP service results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::Contact;

/// Outcome of the best-effort notification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    /// The notifier accepted the message
    Sent,
    /// The notifier returned an error
    Failed,
    /// Phone contact, but no notifier is configured
    NotConfigured,
    /// No delivery channel exists for this contact kind
    NotApplicable,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Sent => "sent",
            NotificationStatus::Failed => "failed",
            NotificationStatus::NotConfigured => "not_configured",
            NotificationStatus::NotApplicable => "not_applicable",
        }
    }
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of generating or resending a code
#[derive(Debug, Clone)]
pub struct IssuedOtp {
    pub otp_id: Uuid,
    pub contact: Contact,
    pub expires_at: DateTime<Utc>,
    pub notification: NotificationStatus,
    /// The raw code, present only when code exposure is enabled
    pub code: Option<String>,
}

/// Result of a successful verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedContact {
    pub otp_id: Uuid,
    pub user_id: Uuid,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub verified_at: DateTime<Utc>,
}
