//! Unit tests for the OTP service

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::entities::Contact;
use crate::errors::{DomainError, OtpError, ValidationError};
use crate::repositories::{MockOtpRepository, MockUserRepository, OtpRepository, UserRepository};
use crate::services::otp::{
    Clock, MockClock, NotificationStatus, NotifierTrait, OtpService, OtpServiceConfig,
};

use super::mocks::MockNotifier;

type TestService = OtpService<MockOtpRepository, MockUserRepository>;

struct Harness {
    service: TestService,
    otps: Arc<MockOtpRepository>,
    users: Arc<MockUserRepository>,
    clock: Arc<MockClock>,
}

fn dev_config() -> OtpServiceConfig {
    OtpServiceConfig {
        expose_code: true,
        ..Default::default()
    }
}

fn harness_with(config: OtpServiceConfig, notifier: Option<Arc<dyn NotifierTrait>>) -> Harness {
    let otps = Arc::new(MockOtpRepository::new());
    let users = Arc::new(MockUserRepository::new());
    let clock = Arc::new(MockClock::new(Utc::now()));
    let service = OtpService::new(otps.clone(), users.clone(), config)
        .with_notifier(notifier)
        .with_clock(clock.clone());
    Harness {
        service,
        otps,
        users,
        clock,
    }
}

fn harness() -> Harness {
    harness_with(dev_config(), None)
}

fn email() -> Contact {
    Contact::Email("a@b.com".to_string())
}

fn phone() -> Contact {
    Contact::Phone("+15551234567".to_string())
}

fn otp_err(result: Result<impl std::fmt::Debug, DomainError>) -> OtpError {
    match result {
        Err(DomainError::Otp(err)) => err,
        other => panic!("expected an OTP error, got {:?}", other),
    }
}

/// A six-digit code guaranteed to differ from `code`
fn wrong_code(code: &str) -> String {
    if code == "000000" {
        "111111".to_string()
    } else {
        "000000".to_string()
    }
}

#[tokio::test]
async fn test_generate_email_success() {
    let h = harness();
    let issued = h.service.generate(email()).await.unwrap();

    let code = issued.code.clone().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(issued.notification, NotificationStatus::NotApplicable);
    assert_eq!(issued.expires_at, h.clock.now() + Duration::minutes(5));

    let stored = h.otps.find_by_id(issued.otp_id).await.unwrap().unwrap();
    assert_eq!(stored.contact, email());
    assert_eq!(stored.code, code);
    assert_eq!(stored.attempt_count, 0);
    assert!(!stored.is_verified);
    assert!(stored.verified_at.is_none());
}

#[tokio::test]
async fn test_generate_rejects_blank_contact_values() {
    let h = harness();

    let err = otp_err(h.service.generate(Contact::Email(String::new())).await);
    assert_eq!(err, OtpError::InvalidInput(ValidationError::InvalidEmail));

    let err = otp_err(h.service.generate(Contact::Email("   ".to_string())).await);
    assert_eq!(err, OtpError::InvalidInput(ValidationError::InvalidEmail));

    for value in ["", "   "] {
        let err = otp_err(h.service.generate(Contact::Phone(value.to_string())).await);
        assert!(matches!(
            err,
            OtpError::InvalidInput(ValidationError::InvalidPhoneLength { .. })
        ));
    }

    assert!(h.otps.is_empty().await);
}

#[tokio::test]
async fn test_generate_phone_sends_sms() {
    let notifier = Arc::new(MockNotifier::new(false));
    let h = harness_with(dev_config(), Some(notifier.clone()));

    let issued = h.service.generate(phone()).await.unwrap();
    assert_eq!(issued.notification, NotificationStatus::Sent);
    assert_eq!(notifier.sent_count(), 1);

    let body = notifier.last_body_for("+15551234567").unwrap();
    assert!(body.contains(&issued.code.unwrap()));
    assert!(body.contains("expire in 5 minutes"));
}

#[tokio::test]
async fn test_generate_email_never_uses_notifier() {
    let notifier = Arc::new(MockNotifier::new(false));
    let h = harness_with(dev_config(), Some(notifier.clone()));

    let issued = h.service.generate(email()).await.unwrap();
    assert_eq!(issued.notification, NotificationStatus::NotApplicable);
    assert_eq!(notifier.sent_count(), 0);
}

#[tokio::test]
async fn test_generate_phone_without_notifier() {
    let h = harness();
    let issued = h.service.generate(phone()).await.unwrap();
    assert_eq!(issued.notification, NotificationStatus::NotConfigured);
    assert_eq!(h.otps.len().await, 1);
}

#[tokio::test]
async fn test_notifier_failure_does_not_fail_request() {
    let notifier = Arc::new(MockNotifier::new(true));
    let h = harness_with(dev_config(), Some(notifier));

    let issued = h.service.generate(phone()).await.unwrap();
    assert_eq!(issued.notification, NotificationStatus::Failed);
    assert!(h.otps.find_by_id(issued.otp_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_production_mode_hides_code() {
    let h = harness_with(OtpServiceConfig::default(), None);
    let issued = h.service.generate(email()).await.unwrap();
    assert!(issued.code.is_none());
}

#[tokio::test]
async fn test_rate_limit_fourth_request_rejected() {
    let h = harness();
    for _ in 0..3 {
        h.service.generate(email()).await.unwrap();
        h.clock.advance(Duration::minutes(1));
    }

    let err = otp_err(h.service.generate(email()).await);
    assert_eq!(err, OtpError::RateLimited { window_minutes: 60 });
    assert_eq!(h.otps.len().await, 3);

    // Other contacts are unaffected
    assert!(h.service.generate(phone()).await.is_ok());
}

#[tokio::test]
async fn test_rate_limit_window_slides() {
    let h = harness();
    let start = h.clock.now();

    h.service.generate(email()).await.unwrap();
    h.clock.set(start + Duration::minutes(30));
    h.service.generate(email()).await.unwrap();
    h.clock.set(start + Duration::minutes(50));
    h.service.generate(email()).await.unwrap();

    h.clock.set(start + Duration::minutes(59));
    assert!(matches!(
        otp_err(h.service.generate(email()).await),
        OtpError::RateLimited { .. }
    ));

    // The first request has left the window; two remain inside it
    h.clock.set(start + Duration::minutes(61));
    assert!(h.service.generate(email()).await.is_ok());
    assert!(matches!(
        otp_err(h.service.generate(email()).await),
        OtpError::RateLimited { .. }
    ));
}

#[tokio::test]
async fn test_rate_limit_resets_after_an_hour() {
    let h = harness();
    for _ in 0..3 {
        h.service.generate(email()).await.unwrap();
    }
    assert!(h.service.generate(email()).await.is_err());

    h.clock.advance(Duration::minutes(61));
    assert!(h.service.generate(email()).await.is_ok());
}

#[tokio::test]
async fn test_resend_counts_toward_rate_limit() {
    let h = harness();
    let first = h.service.generate(phone()).await.unwrap();
    h.service.resend(&first.otp_id.to_string()).await.unwrap();
    h.service.resend(&first.otp_id.to_string()).await.unwrap();

    let err = otp_err(h.service.resend(&first.otp_id.to_string()).await);
    assert!(matches!(err, OtpError::RateLimited { .. }));
    assert_eq!(h.otps.len().await, 3);
}

#[tokio::test]
async fn test_verify_success_creates_user() {
    let h = harness();
    let issued = h.service.generate(phone()).await.unwrap();
    let code = issued.code.unwrap();

    let verified = h
        .service
        .verify(&issued.otp_id.to_string(), &code)
        .await
        .unwrap();

    assert_eq!(verified.otp_id, issued.otp_id);
    assert_eq!(verified.phone.as_deref(), Some("+15551234567"));
    assert!(verified.email.is_none());

    let user = h.users.find_by_id(verified.user_id).await.unwrap().unwrap();
    assert!(user.phone_verified);
    assert!(!user.email_verified);

    let stored = h.otps.find_by_id(issued.otp_id).await.unwrap().unwrap();
    assert!(stored.is_verified);
    assert_eq!(stored.attempt_count, 1);
    assert_eq!(stored.verified_at, Some(verified.verified_at));
}

#[tokio::test]
async fn test_verify_is_single_use() {
    let h = harness();
    let issued = h.service.generate(email()).await.unwrap();
    let id = issued.otp_id.to_string();
    let code = issued.code.unwrap();

    h.service.verify(&id, &code).await.unwrap();
    assert_eq!(otp_err(h.service.verify(&id, &code).await), OtpError::AlreadyVerified);
}

#[tokio::test]
async fn test_wrong_codes_exhaust_attempts() {
    let h = harness();
    let issued = h.service.generate(email()).await.unwrap();
    let id = issued.otp_id.to_string();
    let code = issued.code.unwrap();
    let wrong = wrong_code(&code);

    for remaining in [2, 1, 0] {
        assert_eq!(
            otp_err(h.service.verify(&id, &wrong).await),
            OtpError::CodeMismatch {
                remaining_attempts: remaining
            }
        );
    }
    assert_eq!(
        h.otps.find_by_id(issued.otp_id).await.unwrap().unwrap().attempt_count,
        3
    );

    // Even the correct code is refused now
    assert_eq!(otp_err(h.service.verify(&id, &code).await), OtpError::AttemptsExceeded);
    assert_eq!(
        h.otps.find_by_id(issued.otp_id).await.unwrap().unwrap().attempt_count,
        3
    );
    assert!(h.users.is_empty().await);
}

#[tokio::test]
async fn test_correct_code_on_last_attempt() {
    let h = harness();
    let issued = h.service.generate(email()).await.unwrap();
    let id = issued.otp_id.to_string();
    let code = issued.code.unwrap();
    let wrong = wrong_code(&code);

    h.service.verify(&id, &wrong).await.unwrap_err();
    h.service.verify(&id, &wrong).await.unwrap_err();
    assert!(h.service.verify(&id, &code).await.is_ok());
}

#[tokio::test]
async fn test_verify_expired_code() {
    let h = harness();
    let issued = h.service.generate(email()).await.unwrap();
    let code = issued.code.unwrap();

    h.clock.advance(Duration::minutes(5) + Duration::seconds(1));
    assert_eq!(
        otp_err(h.service.verify(&issued.otp_id.to_string(), &code).await),
        OtpError::Expired
    );

    let stored = h.otps.find_by_id(issued.otp_id).await.unwrap().unwrap();
    assert_eq!(stored.attempt_count, 0);
    assert!(!stored.is_verified);
}

#[tokio::test]
async fn test_verify_at_exact_expiry_succeeds() {
    let h = harness();
    let issued = h.service.generate(email()).await.unwrap();
    h.clock.set(issued.expires_at);

    assert!(h
        .service
        .verify(&issued.otp_id.to_string(), &issued.code.unwrap())
        .await
        .is_ok());
}

#[tokio::test]
async fn test_already_verified_takes_precedence_over_expiry() {
    let h = harness();
    let issued = h.service.generate(email()).await.unwrap();
    let id = issued.otp_id.to_string();
    let code = issued.code.unwrap();
    h.service.verify(&id, &code).await.unwrap();

    h.clock.advance(Duration::hours(2));
    assert_eq!(otp_err(h.service.verify(&id, &code).await), OtpError::AlreadyVerified);
}

#[tokio::test]
async fn test_expiry_takes_precedence_over_exhaustion() {
    let h = harness();
    let issued = h.service.generate(email()).await.unwrap();
    let id = issued.otp_id.to_string();
    let wrong = wrong_code(issued.code.as_deref().unwrap());
    for _ in 0..3 {
        h.service.verify(&id, &wrong).await.unwrap_err();
    }

    h.clock.advance(Duration::minutes(6));
    assert_eq!(otp_err(h.service.verify(&id, &wrong).await), OtpError::Expired);
}

#[tokio::test]
async fn test_verify_unknown_or_malformed_id() {
    let h = harness();
    assert_eq!(
        otp_err(h.service.verify(&uuid::Uuid::new_v4().to_string(), "123456").await),
        OtpError::NotFound
    );
    assert_eq!(
        otp_err(h.service.verify("not-a-uuid", "123456").await),
        OtpError::NotFound
    );
}

#[tokio::test]
async fn test_verify_rejects_malformed_code_without_consuming_attempt() {
    let h = harness();
    let issued = h.service.generate(email()).await.unwrap();
    let id = issued.otp_id.to_string();

    for bad in ["12345", "1234567", "12a456", ""] {
        assert_eq!(
            otp_err(h.service.verify(&id, bad).await),
            OtpError::InvalidInput(ValidationError::InvalidCodeFormat { expected: 6 })
        );
    }
    assert_eq!(
        h.otps.find_by_id(issued.otp_id).await.unwrap().unwrap().attempt_count,
        0
    );
}

#[tokio::test]
async fn test_resend_issues_new_record_for_same_contact() {
    let notifier = Arc::new(MockNotifier::new(false));
    let h = harness_with(dev_config(), Some(notifier.clone()));
    let first = h.service.generate(phone()).await.unwrap();

    let resent = h.service.resend(&first.otp_id.to_string()).await.unwrap();
    assert_ne!(resent.otp_id, first.otp_id);
    assert_eq!(resent.contact, phone());
    assert_eq!(resent.notification, NotificationStatus::Sent);
    assert_eq!(notifier.sent_count(), 2);

    let new_record = h.otps.find_by_id(resent.otp_id).await.unwrap().unwrap();
    assert_eq!(new_record.attempt_count, 0);

    // The original code is still outstanding and usable
    assert!(h
        .service
        .verify(&first.otp_id.to_string(), &first.code.unwrap())
        .await
        .is_ok());
}

#[tokio::test]
async fn test_resend_after_original_expired() {
    let h = harness();
    let first = h.service.generate(email()).await.unwrap();
    h.clock.advance(Duration::minutes(10));

    let resent = h.service.resend(&first.otp_id.to_string()).await.unwrap();
    assert_eq!(resent.expires_at, h.clock.now() + Duration::minutes(5));
}

#[tokio::test]
async fn test_resend_verified_otp_rejected() {
    let h = harness();
    let issued = h.service.generate(email()).await.unwrap();
    let id = issued.otp_id.to_string();
    h.service.verify(&id, &issued.code.unwrap()).await.unwrap();

    assert_eq!(otp_err(h.service.resend(&id).await), OtpError::AlreadyVerified);
    assert_eq!(h.otps.len().await, 1);
}

#[tokio::test]
async fn test_resend_unknown_id() {
    let h = harness();
    assert_eq!(
        otp_err(h.service.resend(&uuid::Uuid::new_v4().to_string()).await),
        OtpError::NotFound
    );
    assert!(h.otps.is_empty().await);
}

#[tokio::test]
async fn test_repeat_verification_reuses_user() {
    let h = harness();
    let first = h.service.generate(email()).await.unwrap();
    let a = h
        .service
        .verify(&first.otp_id.to_string(), &first.code.unwrap())
        .await
        .unwrap();

    let second = h.service.generate(email()).await.unwrap();
    let b = h
        .service
        .verify(&second.otp_id.to_string(), &second.code.unwrap())
        .await
        .unwrap();

    assert_eq!(a.user_id, b.user_id);
    assert_eq!(h.users.len().await, 1);
}

#[tokio::test]
async fn test_storage_failure_surfaces() {
    let h = harness();
    h.otps.set_unavailable(true);
    assert!(matches!(
        h.service.generate(email()).await,
        Err(DomainError::Storage { .. })
    ));
    assert!(matches!(
        h.service.verify(&uuid::Uuid::new_v4().to_string(), "123456").await,
        Err(DomainError::Storage { .. })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_wrong_codes_never_exceed_cap() {
    let h = harness();
    let issued = h.service.generate(email()).await.unwrap();
    let wrong = wrong_code(issued.code.as_deref().unwrap());
    let service = Arc::new(h.service);

    let mut handles = Vec::new();
    for _ in 0..10 {
        let service = service.clone();
        let id = issued.otp_id.to_string();
        let wrong = wrong.clone();
        handles.push(tokio::spawn(async move { service.verify(&id, &wrong).await }));
    }

    let mut mismatches = 0;
    let mut exhausted = 0;
    for handle in handles {
        match otp_err(handle.await.unwrap()) {
            OtpError::CodeMismatch { .. } => mismatches += 1,
            OtpError::AttemptsExceeded => exhausted += 1,
            other => panic!("unexpected error {:?}", other),
        }
    }

    assert_eq!(mismatches, 3);
    assert_eq!(exhausted, 7);
    assert_eq!(
        h.otps.find_by_id(issued.otp_id).await.unwrap().unwrap().attempt_count,
        3
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_correct_codes_verify_once() {
    let h = harness();
    let issued = h.service.generate(email()).await.unwrap();
    let code = issued.code.clone().unwrap();
    let service = Arc::new(h.service);

    let mut handles = Vec::new();
    for _ in 0..3 {
        let service = service.clone();
        let id = issued.otp_id.to_string();
        let code = code.clone();
        handles.push(tokio::spawn(async move { service.verify(&id, &code).await }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(DomainError::Otp(OtpError::AlreadyVerified)) => {}
            Err(other) => panic!("unexpected error {:?}", other),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(h.users.len().await, 1);
}
