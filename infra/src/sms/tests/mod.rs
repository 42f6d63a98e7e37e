//! Unit tests for the SMS notifiers

mod mock_sms_tests;
