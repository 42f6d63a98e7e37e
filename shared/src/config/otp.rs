//! OTP policy configuration module

use serde::{Deserialize, Serialize};

use super::{env_or, ConfigError};

/// Numbers governing OTP issuance and verification
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OtpPolicyConfig {
    /// Number of digits in a generated code
    pub code_length: usize,

    /// Minutes a code stays valid after creation
    pub ttl_minutes: i64,

    /// Verification attempts allowed per code
    pub max_attempts: u32,

    /// Codes a single contact may request inside the rate-limit window
    pub rate_limit_max_requests: u32,

    /// Length of the trailing rate-limit window in minutes
    pub rate_limit_window_minutes: i64,
}

impl Default for OtpPolicyConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            ttl_minutes: 5,
            max_attempts: 3,
            rate_limit_max_requests: 3,
            rate_limit_window_minutes: 60,
        }
    }
}

impl OtpPolicyConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            code_length: env_or("OTP_CODE_LENGTH", defaults.code_length),
            ttl_minutes: env_or("OTP_TTL_MINUTES", defaults.ttl_minutes),
            max_attempts: env_or("OTP_MAX_ATTEMPTS", defaults.max_attempts),
            rate_limit_max_requests: env_or(
                "OTP_RATE_LIMIT_MAX_REQUESTS",
                defaults.rate_limit_max_requests,
            ),
            rate_limit_window_minutes: env_or(
                "OTP_RATE_LIMIT_WINDOW_MINUTES",
                defaults.rate_limit_window_minutes,
            ),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(4..=10).contains(&self.code_length) {
            return Err(ConfigError::invalid("OTP_CODE_LENGTH", "must be between 4 and 10"));
        }
        if self.ttl_minutes < 1 {
            return Err(ConfigError::invalid("OTP_TTL_MINUTES", "must be at least 1"));
        }
        if self.max_attempts < 1 {
            return Err(ConfigError::invalid("OTP_MAX_ATTEMPTS", "must be at least 1"));
        }
        if self.rate_limit_max_requests < 1 {
            return Err(ConfigError::invalid(
                "OTP_RATE_LIMIT_MAX_REQUESTS",
                "must be at least 1",
            ));
        }
        if self.rate_limit_window_minutes < 1 {
            return Err(ConfigError::invalid(
                "OTP_RATE_LIMIT_WINDOW_MINUTES",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = OtpPolicyConfig::default();
        assert_eq!(policy.code_length, 6);
        assert_eq!(policy.ttl_minutes, 5);
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.rate_limit_max_requests, 3);
        assert_eq!(policy.rate_limit_window_minutes, 60);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_code_length_bounds() {
        let short = OtpPolicyConfig {
            code_length: 3,
            ..Default::default()
        };
        let long = OtpPolicyConfig {
            code_length: 11,
            ..Default::default()
        };
        assert!(short.validate().is_err());
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_window() {
        let policy = OtpPolicyConfig {
            rate_limit_window_minutes: 0,
            ..Default::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(ConfigError::Invalid { key: "OTP_RATE_LIMIT_WINDOW_MINUTES", .. })
        ));
    }
}
