//! OTP record repository module.

mod r#trait;
pub use r#trait::OtpRepository;

mod mock;
pub use mock::MockOtpRepository;
