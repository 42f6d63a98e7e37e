//! OTP route handlers
//!
//! - `POST /api/otp/generate` - issue a code for an email or phone number
//! - `POST /api/otp/verify` - check a submitted code
//! - `POST /api/otp/resend` - issue a fresh code for an existing record's contact

pub mod generate;
pub mod resend;
pub mod verify;

use std::sync::Arc;

use otp_core::repositories::{OtpRepository, UserRepository};
use otp_core::services::otp::OtpService;

/// Application state that holds shared services
pub struct AppState<R, U>
where
    R: OtpRepository,
    U: UserRepository,
{
    pub otp_service: Arc<OtpService<R, U>>,
}

impl<R, U> AppState<R, U>
where
    R: OtpRepository,
    U: UserRepository,
{
    pub fn new(otp_service: Arc<OtpService<R, U>>) -> Self {
        Self { otp_service }
    }
}
