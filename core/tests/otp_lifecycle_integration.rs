//! End-to-end lifecycle tests through the public API of the OTP service

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use otp_core::domain::entities::Contact;
    use otp_core::errors::{DomainError, OtpError};
    use otp_core::repositories::{
        MockOtpRepository, MockUserRepository, OtpRepository, UserRepository,
    };
    use otp_core::services::otp::{
        MockClock, NotificationStatus, NotifierTrait, OtpService, OtpServiceConfig,
    };

    /// Captures SMS bodies so the test can read the code like a user would
    struct InboxNotifier {
        inbox: Mutex<Vec<(String, String)>>,
    }

    impl InboxNotifier {
        fn new() -> Self {
            Self {
                inbox: Mutex::new(Vec::new()),
            }
        }

        fn code_sent_to(&self, phone: &str) -> Option<String> {
            let inbox = self.inbox.lock().unwrap();
            let (_, body) = inbox.iter().rev().find(|(to, _)| to == phone)?;
            body.split(':')
                .nth(1)
                .map(|rest| rest.trim().chars().take_while(|c| c.is_ascii_digit()).collect())
        }
    }

    #[async_trait]
    impl NotifierTrait for InboxNotifier {
        async fn send_message(&self, destination: &str, body: &str) -> Result<String, String> {
            self.inbox
                .lock()
                .unwrap()
                .push((destination.to_string(), body.to_string()));
            Ok("SM-test".to_string())
        }

        fn provider_name(&self) -> &str {
            "inbox"
        }
    }

    struct System {
        service: OtpService<MockOtpRepository, MockUserRepository>,
        otps: Arc<MockOtpRepository>,
        users: Arc<MockUserRepository>,
        clock: Arc<MockClock>,
    }

    fn system(expose_code: bool, notifier: Option<Arc<dyn NotifierTrait>>) -> System {
        let otps = Arc::new(MockOtpRepository::new());
        let users = Arc::new(MockUserRepository::new());
        let clock = Arc::new(MockClock::new(Utc::now()));
        let config = OtpServiceConfig {
            expose_code,
            ..Default::default()
        };
        let service = OtpService::new(otps.clone(), users.clone(), config)
            .with_notifier(notifier)
            .with_clock(clock.clone());
        System {
            service,
            otps,
            users,
            clock,
        }
    }

    #[tokio::test]
    async fn test_phone_flow_creates_phone_verified_user() {
        let inbox = Arc::new(InboxNotifier::new());
        let sys = system(false, Some(inbox.clone()));
        let contact = Contact::from_parts(None, Some("+15551234567")).unwrap();

        let issued = sys.service.generate(contact.clone()).await.unwrap();
        assert_eq!(issued.notification, NotificationStatus::Sent);
        assert!(issued.code.is_none());

        let code = inbox.code_sent_to("+15551234567").unwrap();
        assert_eq!(code.len(), 6);

        let verified = sys
            .service
            .verify(&issued.otp_id.to_string(), &code)
            .await
            .unwrap();

        let user = sys.users.find_by_contact(&contact).await.unwrap().unwrap();
        assert_eq!(user.id, verified.user_id);
        assert!(user.phone_verified);
        assert!(!user.email_verified);
        assert!(user.email.is_none());
        assert_eq!(verified.email, None);
    }

    #[tokio::test]
    async fn test_email_flow_rate_limit_creates_no_fourth_record() {
        let sys = system(true, None);
        let contact = Contact::from_parts(Some("a@b.com"), None).unwrap();

        for i in 0..3 {
            let issued = sys.service.generate(contact.clone()).await.unwrap();
            assert_eq!(issued.notification, NotificationStatus::NotApplicable);
            sys.clock.advance(Duration::minutes(10 + i));
        }

        let err = sys.service.generate(contact.clone()).await.unwrap_err();
        assert!(matches!(err, DomainError::Otp(OtpError::RateLimited { .. })));
        assert_eq!(sys.otps.find_by_contact(&contact).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_full_lifecycle_with_resend() {
        let sys = system(true, None);
        let contact = Contact::from_parts(Some("user@example.com"), None).unwrap();

        let first = sys.service.generate(contact.clone()).await.unwrap();
        sys.clock.advance(Duration::minutes(6));

        // The first code has lapsed; ask for another one
        let expired = sys
            .service
            .verify(&first.otp_id.to_string(), first.code.as_deref().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(expired, DomainError::Otp(OtpError::Expired)));

        let second = sys.service.resend(&first.otp_id.to_string()).await.unwrap();
        let verified = sys
            .service
            .verify(&second.otp_id.to_string(), second.code.as_deref().unwrap())
            .await
            .unwrap();
        assert_eq!(verified.email.as_deref(), Some("user@example.com"));

        // Verified records cannot be resent
        let err = sys
            .service
            .resend(&second.otp_id.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Otp(OtpError::AlreadyVerified)));

        let history = sys.otps.find_by_contact(&contact).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].is_verified);
        assert!(!history[1].is_verified);
    }
}
