//! OTP lifecycle service module
//!
//! This module provides the complete one-time passcode workflow:
//! - Uniform numeric code generation from the OS CSPRNG
//! - Issuance with a per-contact sliding-window rate limit
//! - Verification with atomic attempt tracking and single-use consumption
//! - Resend of a fresh code for the same contact
//! - Best-effort SMS delivery through an optional notifier

mod clock;
mod config;
pub mod generator;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use clock::{Clock, MockClock, SystemClock};
pub use config::OtpServiceConfig;
pub use generator::{generate_code, generate_code_with};
pub use service::OtpService;
pub use traits::NotifierTrait;
pub use types::{IssuedOtp, NotificationStatus, VerifiedContact};
