//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `otp` - OTP issuance policy (length, TTL, attempt cap, rate limit)
//! - `server` - HTTP server and CORS configuration
//! - `sms` - Outbound SMS provider credentials
//!
//! Everything is read from the process environment exactly once at startup
//! and handed down to the components that need it.

pub mod database;
pub mod environment;
pub mod otp;
pub mod server;
pub mod sms;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::OtpPolicyConfig;
pub use server::{CorsConfig, ServerConfig};
pub use sms::{SmsConfig, SmsProvider, TwilioCredentials};

/// Errors raised while validating configuration at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            message: message.into(),
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// SMS provider configuration
    #[serde(default)]
    pub sms: SmsConfig,

    /// OTP policy
    #[serde(default)]
    pub otp: OtpPolicyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            cors: CorsConfig::default(),
            sms: SmsConfig::default(),
            otp: OtpPolicyConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            cors: CorsConfig::from_env(),
            sms: SmsConfig::from_env(),
            otp: OtpPolicyConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Validate the whole configuration, failing on the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.otp.validate()?;
        self.sms.validate()?;
        // The mock provider prints message bodies, codes included, to stdout
        if self.environment.is_production() && self.sms.provider == SmsProvider::Mock {
            return Err(ConfigError::invalid(
                "SMS_PROVIDER",
                "the mock provider is not allowed in production",
            ));
        }
        Ok(())
    }

    /// Whether raw codes may be echoed in responses and debug logs
    pub fn expose_code(&self) -> bool {
        !self.environment.is_production()
    }
}

/// Read an environment variable and parse it, falling back to `default`
/// when the variable is unset or unparsable.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Read an environment variable, treating blank values as unset
pub(crate) fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
