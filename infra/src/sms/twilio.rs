//! Twilio SMS Service Implementation
//!
//! Sends messages through the Twilio Messages REST API with a single
//! form-encoded POST per message. There is no retry: a failed delivery is
//! reported to the caller, which records it and moves on.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use otp_core::services::otp::NotifierTrait;
use otp_shared::config::TwilioCredentials;
use otp_shared::utils::phone::mask_phone_number;

use crate::InfrastructureError;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Twilio's message length limit
const MAX_BODY_LENGTH: usize = 1600;

/// Fields of interest in a Twilio Messages API response
#[derive(Debug, Default, Deserialize)]
pub struct TwilioResponse {
    #[serde(default)]
    pub sid: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "error_code")]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Twilio SMS service implementation
pub struct TwilioSmsService {
    client: reqwest::Client,
    credentials: TwilioCredentials,
    api_base: String,
}

impl TwilioSmsService {
    /// Create a new Twilio SMS service
    ///
    /// # Arguments
    /// * `credentials` - Account SID, auth token and sending number
    /// * `request_timeout` - Upper bound on each API call
    pub fn new(
        credentials: TwilioCredentials,
        request_timeout: Duration,
    ) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        info!(
            from = %mask_phone_number(&credentials.from_number),
            "Twilio SMS service initialized"
        );

        Ok(Self {
            client,
            credentials,
            api_base: TWILIO_API_BASE.to_string(),
        })
    }

    /// Point the client at a different API host
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            self.credentials.account_sid
        )
    }

    /// Send one SMS, returning the Twilio message SID
    pub async fn send_sms(&self, to: &str, body: &str) -> Result<String, InfrastructureError> {
        if body.len() > MAX_BODY_LENGTH {
            return Err(InfrastructureError::Sms(format!(
                "Message exceeds maximum length of {} characters",
                MAX_BODY_LENGTH
            )));
        }

        debug!(to = %mask_phone_number(to), message_length = body.len(), "Sending SMS via Twilio");

        let params = [
            ("To", to),
            ("From", self.credentials.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.credentials.account_sid, Some(&self.credentials.auth_token))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let sid = parse_response(status.as_u16(), &text)?;

        info!(
            to = %mask_phone_number(to),
            sid = %sid,
            "SMS sent successfully via Twilio"
        );
        Ok(sid)
    }
}

/// Interpret a Messages API response body
pub fn parse_response(status: u16, body: &str) -> Result<String, InfrastructureError> {
    let parsed: TwilioResponse = serde_json::from_str(body).map_err(|e| {
        InfrastructureError::Sms(format!("Failed to parse Twilio response ({}): {}", status, e))
    })?;

    if status >= 400 {
        return Err(InfrastructureError::Sms(format!(
            "Twilio error ({}): {}",
            parsed.code.unwrap_or(i64::from(status)),
            parsed.message.unwrap_or_else(|| "unknown error".to_string())
        )));
    }

    parsed
        .sid
        .ok_or_else(|| InfrastructureError::Sms("Twilio response did not include a message SID".to_string()))
}

#[async_trait]
impl NotifierTrait for TwilioSmsService {
    async fn send_message(&self, destination: &str, body: &str) -> Result<String, String> {
        self.send_sms(destination, body).await.map_err(|e| {
            error!(
                to = %mask_phone_number(destination),
                error = %e,
                "Failed to send SMS via Twilio"
            );
            e.to_string()
        })
    }

    fn provider_name(&self) -> &str {
        "Twilio"
    }
}
