//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    generate_code, Clock, IssuedOtp, MockClock, NotificationStatus, NotifierTrait, OtpService,
    OtpServiceConfig, SystemClock, VerifiedContact,
};
