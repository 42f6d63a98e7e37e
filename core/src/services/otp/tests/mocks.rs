//! Mock collaborators for testing the OTP service

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::services::otp::traits::NotifierTrait;

/// Records every message instead of sending it
pub struct MockNotifier {
    pub sent_messages: Arc<Mutex<Vec<(String, String)>>>,
    pub should_fail: bool,
}

impl MockNotifier {
    pub fn new(should_fail: bool) -> Self {
        Self {
            sent_messages: Arc::new(Mutex::new(Vec::new())),
            should_fail,
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent_messages.lock().unwrap().len()
    }

    /// Body of the last message sent to `destination`
    pub fn last_body_for(&self, destination: &str) -> Option<String> {
        self.sent_messages
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == destination)
            .map(|(_, body)| body.clone())
    }
}

#[async_trait]
impl NotifierTrait for MockNotifier {
    async fn send_message(&self, destination: &str, body: &str) -> Result<String, String> {
        if self.should_fail {
            return Err("carrier rejected message".to_string());
        }
        self.sent_messages
            .lock()
            .unwrap()
            .push((destination.to_string(), body.to_string()));
        Ok(format!("mock-msg-{}", uuid::Uuid::new_v4()))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
