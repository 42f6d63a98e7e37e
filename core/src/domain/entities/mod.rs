//! Domain entities representing core business objects.

pub mod contact;
pub mod otp;
pub mod user;

// Re-export commonly used types
pub use contact::{Contact, ContactKind};
pub use otp::{OtpRecord, OtpStatus, CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES, MAX_ATTEMPTS};
pub use user::User;
