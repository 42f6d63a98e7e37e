//! SMS Service Module
//!
//! Notifier implementations for delivering codes by SMS:
//!
//! - **Twilio**: Production SMS via the Twilio REST API
//! - **Mock**: Console output for development
//!
//! When no provider is configured the service runs without a notifier and
//! phone deliveries are reported as `not_configured`.

use std::sync::Arc;
use std::time::Duration;

use otp_core::services::otp::NotifierTrait;
use otp_shared::config::{SmsConfig, SmsProvider};

use crate::InfrastructureError;

pub mod mock_sms;
pub mod twilio;

pub use mock_sms::MockSmsService;
pub use twilio::TwilioSmsService;

#[cfg(test)]
mod tests;

/// Create the notifier selected by configuration
///
/// # Returns
///
/// * `Ok(Some(notifier))` - A provider is configured
/// * `Ok(None)` - SMS delivery is disabled
/// * `Err(InfrastructureError)` - Twilio was selected without complete credentials
pub fn create_notifier(
    config: &SmsConfig,
) -> Result<Option<Arc<dyn NotifierTrait>>, InfrastructureError> {
    match config.provider {
        SmsProvider::Twilio => {
            let credentials = config.twilio_credentials().ok_or_else(|| {
                InfrastructureError::Config(
                    "TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN and TWILIO_PHONE_NUMBER must all be set"
                        .to_string(),
                )
            })?;
            let service = TwilioSmsService::new(
                credentials,
                Duration::from_secs(config.request_timeout_secs),
            )?;
            Ok(Some(Arc::new(service)))
        }
        SmsProvider::Mock => {
            tracing::warn!("Using mock SMS service; codes are printed to the console");
            Ok(Some(Arc::new(MockSmsService::new())))
        }
        SmsProvider::None => {
            tracing::warn!(
                "SMS provider not configured. Set TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN and TWILIO_PHONE_NUMBER"
            );
            Ok(None)
        }
    }
}
