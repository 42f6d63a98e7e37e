//! Error types for the OTP lifecycle and input validation
//!
//! Display strings double as the user-facing messages returned by the API.

use thiserror::Error;

/// OTP lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("{0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Too many OTP requests. Please try again in {window_minutes} minutes")]
    RateLimited { window_minutes: i64 },

    #[error("OTP not found")]
    NotFound,

    #[error("OTP already verified")]
    AlreadyVerified,

    #[error("OTP has expired")]
    Expired,

    #[error("Maximum verification attempts exceeded")]
    AttemptsExceeded,

    #[error("Invalid OTP code. {remaining_attempts} attempts remaining")]
    CodeMismatch { remaining_attempts: u32 },

    #[error("Failed to generate OTP: secure randomness unavailable")]
    RandomnessUnavailable,
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Either email or phone number is required")]
    MissingContact,

    #[error("Provide either an email or a phone number, not both")]
    ConflictingContact,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Phone number must be between {min} and {max} characters")]
    InvalidPhoneLength { min: usize, max: usize },

    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("OTP code must be {expected} digits")]
    InvalidCodeFormat { expected: usize },
}
