use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use otp_core::services::otp::{IssuedOtp, NotificationStatus, VerifiedContact};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GenerateOtpRequest {
    /// Email address to verify. Empty strings count as absent.
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(email)]
    pub email: Option<String>,

    /// Phone number to verify, 10 to 15 characters
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 10, max = 15))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(length(min = 1))]
    pub otp_id: String,

    /// Numeric code; its exact length is checked against the configured policy
    #[validate(length(min = 4, max = 10))]
    pub otp_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResendOtpRequest {
    #[validate(length(min = 1))]
    pub otp_id: String,
}

/// Payload of generate and resend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpIssuedResponse {
    pub otp_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub sms_status: NotificationStatus,
    /// Only present outside production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp_code: Option<String>,
}

impl From<IssuedOtp> for OtpIssuedResponse {
    fn from(issued: IssuedOtp) -> Self {
        Self {
            otp_id: issued.otp_id,
            expires_at: issued.expires_at,
            sms_status: issued.notification,
            otp_code: issued.code,
        }
    }
}

/// Payload of verify. Absent contacts serialize as empty strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpVerifiedResponse {
    pub verified: bool,
    pub user_id: Uuid,
    pub email: String,
    pub phone: String,
    pub timestamp: DateTime<Utc>,
}

impl From<VerifiedContact> for OtpVerifiedResponse {
    fn from(verified: VerifiedContact) -> Self {
        Self {
            verified: true,
            user_id: verified.user_id,
            email: verified.email.unwrap_or_default(),
            phone: verified.phone.unwrap_or_default(),
            timestamp: verified.verified_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}
