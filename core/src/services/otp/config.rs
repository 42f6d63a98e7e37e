//! Configuration for the OTP service

use chrono::Duration;
use otp_shared::config::OtpPolicyConfig;

use crate::domain::entities::otp::{CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES, MAX_ATTEMPTS};

/// Configuration for the OTP service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpServiceConfig {
    /// Number of digits per code
    pub code_length: usize,
    /// Number of minutes before a code expires
    pub code_expiration_minutes: i64,
    /// Maximum number of verification attempts allowed per code
    pub max_attempts: u32,
    /// Codes a contact may request within the window
    pub rate_limit_max_requests: u32,
    /// Trailing rate-limit window in minutes
    pub rate_limit_window_minutes: i64,
    /// Return raw codes to callers and log them at debug (non-production only)
    pub expose_code: bool,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            code_length: CODE_LENGTH,
            code_expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
            max_attempts: MAX_ATTEMPTS,
            rate_limit_max_requests: 3,
            rate_limit_window_minutes: 60,
            expose_code: false,
        }
    }
}

impl OtpServiceConfig {
    /// Build from the startup policy configuration
    pub fn from_policy(policy: &OtpPolicyConfig, expose_code: bool) -> Self {
        Self {
            code_length: policy.code_length,
            code_expiration_minutes: policy.ttl_minutes,
            max_attempts: policy.max_attempts,
            rate_limit_max_requests: policy.rate_limit_max_requests,
            rate_limit_window_minutes: policy.rate_limit_window_minutes,
            expose_code,
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::minutes(self.code_expiration_minutes)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::minutes(self.rate_limit_window_minutes)
    }
}
