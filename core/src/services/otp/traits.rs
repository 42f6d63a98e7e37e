//! Traits for outbound notification integration

use async_trait::async_trait;

/// Outbound message channel (SMS)
#[async_trait]
pub trait NotifierTrait: Send + Sync {
    /// Deliver `body` to `destination`, returning the provider message id
    async fn send_message(&self, destination: &str, body: &str) -> Result<String, String>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;
}
