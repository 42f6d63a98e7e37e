//! Shared utilities and common types for the OTP verification server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error codes and the API response envelope
//! - Utility functions (contact validation, log masking)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, CorsConfig, DatabaseConfig, Environment, LogFormat, LoggingConfig,
    OtpPolicyConfig, ServerConfig, SmsConfig, SmsProvider,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::ApiResponse;
pub use utils::{masking, phone, validation};
