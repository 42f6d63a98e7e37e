//! Unit tests for mock SMS service

use otp_core::services::otp::NotifierTrait;

use crate::sms::MockSmsService;
use crate::InfrastructureError;

#[tokio::test]
async fn test_mock_sms_send_success() {
    let service = MockSmsService::with_options(false, false);
    let result = service.send_sms("+15551234567", "Test message").await;

    let message_id = result.unwrap();
    assert!(message_id.starts_with("mock_"));
    assert_eq!(service.get_message_count(), 1);
}

#[tokio::test]
async fn test_mock_sms_invalid_phone() {
    let service = MockSmsService::with_options(false, false);
    let result = service.send_sms("12345", "Test message").await;

    match result {
        Err(InfrastructureError::Sms(msg)) => assert!(msg.contains("Invalid phone number")),
        other => panic!("Expected Sms error, got {:?}", other),
    }
    assert_eq!(service.get_message_count(), 0);
}

#[tokio::test]
async fn test_mock_sms_simulate_failure() {
    let service = MockSmsService::with_options(false, true);

    let result = service.send_message("+15551234567", "Test message").await;
    assert_eq!(
        result.unwrap_err(),
        "SMS service error: Simulated SMS sending failure"
    );

    service.set_simulate_failure(false);
    assert!(service.send_message("+15551234567", "Test message").await.is_ok());
}

#[tokio::test]
async fn test_mock_sms_counter_shared_between_clones() {
    let service = MockSmsService::with_options(false, false);
    let clone = service.clone();

    for i in 1..=3 {
        clone
            .send_sms("+15551234567", &format!("Message {}", i))
            .await
            .unwrap();
        assert_eq!(service.get_message_count(), i);
    }
}

#[test]
fn test_provider_name() {
    let service = MockSmsService::new();
    assert_eq!(service.provider_name(), "Mock");
}
