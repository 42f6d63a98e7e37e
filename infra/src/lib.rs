//! # Infrastructure Layer
//!
//! Concrete adapters behind the OTP core's interfaces.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL pool, embedded migrations and repository
//!   implementations using SQLx
//! - **SMS**: Twilio REST client and a console mock implementing the core
//!   notifier trait

pub mod database;
pub mod sms;

pub use database::{DatabasePool, MySqlOtpRepository, MySqlUserRepository, PoolStatistics};
pub use sms::{create_notifier, MockSmsService, TwilioSmsService};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),
}
