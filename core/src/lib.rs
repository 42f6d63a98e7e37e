//! # OTP Core
//!
//! Domain layer of the OTP verification backend.
//! This crate contains the OTP and user entities, the repository interfaces
//! the service persists through, the code generator, and the lifecycle
//! service that issues, verifies and resends one-time passcodes.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
