//! Domain-specific error types and error handling.

mod types;

pub use types::{OtpError, ValidationError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    /// A lifecycle rule rejected the request
    #[error(transparent)]
    Otp(#[from] OtpError),

    /// The persistence engine failed or timed out
    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// The lifecycle error, if this is one
    pub fn as_otp(&self) -> Option<&OtpError> {
        match self {
            DomainError::Otp(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::Otp(OtpError::InvalidInput(err))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
