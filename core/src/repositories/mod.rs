//! Repository interfaces the domain persists through, with in-memory
//! implementations used by tests and local tooling.

pub mod otp;
pub mod user;

pub use otp::{MockOtpRepository, OtpRepository};
pub use user::{MockUserRepository, UserRepository};
