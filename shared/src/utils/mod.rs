//! Common utility functions

pub mod masking;
pub mod phone;
pub mod validation;

// Re-export commonly used utilities
pub use masking::*;
pub use phone::*;
pub use validation::*;
