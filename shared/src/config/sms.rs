//! SMS provider configuration module

use serde::{Deserialize, Serialize};

use super::{env_opt, env_or, ConfigError};
use crate::utils::phone::is_valid_international_phone;

/// Which outbound SMS channel to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    /// Twilio REST API
    Twilio,
    /// Console output, for local development
    Mock,
    /// No notifier; phone codes are stored but not delivered
    #[default]
    None,
}

impl std::str::FromStr for SmsProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "twilio" => Ok(SmsProvider::Twilio),
            "mock" | "console" => Ok(SmsProvider::Mock),
            "none" | "disabled" => Ok(SmsProvider::None),
            _ => Err(format!("Invalid SMS provider: {}", s)),
        }
    }
}

/// Complete Twilio credentials
#[derive(Clone, Deserialize, Serialize)]
pub struct TwilioCredentials {
    pub account_sid: String,
    #[serde(skip_serializing)]
    pub auth_token: String,
    pub from_number: String,
}

impl std::fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[REDACTED]")
            .field("from_number", &self.from_number)
            .finish()
    }
}

/// SMS configuration.
///
/// Missing credentials are not an error: the service simply reports
/// `not_configured` for phone deliveries. Partially supplied credentials are
/// rejected at startup.
#[derive(Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    pub provider: SmsProvider,
    pub twilio_account_sid: Option<String>,
    #[serde(skip_serializing)]
    pub twilio_auth_token: Option<String>,
    pub twilio_from_number: Option<String>,
    /// Per-request timeout against the provider API
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for SmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsConfig")
            .field("provider", &self.provider)
            .field("twilio_account_sid", &self.twilio_account_sid)
            .field("twilio_auth_token", &self.twilio_auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("twilio_from_number", &self.twilio_from_number)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: SmsProvider::None,
            twilio_account_sid: None,
            twilio_auth_token: None,
            twilio_from_number: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl SmsConfig {
    /// Read TWILIO_* variables and SMS_PROVIDER.
    ///
    /// Without an explicit SMS_PROVIDER, Twilio is selected when its
    /// credentials are present.
    pub fn from_env() -> Self {
        let twilio_account_sid = env_opt("TWILIO_ACCOUNT_SID");
        let twilio_auth_token = env_opt("TWILIO_AUTH_TOKEN");
        let twilio_from_number = env_opt("TWILIO_PHONE_NUMBER");

        let provider = env_opt("SMS_PROVIDER")
            .and_then(|p| p.parse().ok())
            .unwrap_or(
                if twilio_account_sid.is_some()
                    || twilio_auth_token.is_some()
                    || twilio_from_number.is_some()
                {
                    SmsProvider::Twilio
                } else {
                    SmsProvider::None
                },
            );

        Self {
            provider,
            twilio_account_sid,
            twilio_auth_token,
            twilio_from_number,
            request_timeout_secs: env_or("SMS_REQUEST_TIMEOUT_SECS", default_request_timeout()),
        }
    }

    /// Twilio credentials when all three parts are present
    pub fn twilio_credentials(&self) -> Option<TwilioCredentials> {
        Some(TwilioCredentials {
            account_sid: self.twilio_account_sid.clone()?,
            auth_token: self.twilio_auth_token.clone()?,
            from_number: self.twilio_from_number.clone()?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider != SmsProvider::Twilio {
            return Ok(());
        }
        if self.twilio_account_sid.is_none() {
            return Err(ConfigError::Missing("TWILIO_ACCOUNT_SID"));
        }
        if self.twilio_auth_token.is_none() {
            return Err(ConfigError::Missing("TWILIO_AUTH_TOKEN"));
        }
        match &self.twilio_from_number {
            None => Err(ConfigError::Missing("TWILIO_PHONE_NUMBER")),
            Some(number) if !is_valid_international_phone(number) => Err(ConfigError::invalid(
                "TWILIO_PHONE_NUMBER",
                "must be in E.164 format",
            )),
            Some(_) => Ok(()),
        }
    }
}

fn default_request_timeout() -> u64 {
    10
}
