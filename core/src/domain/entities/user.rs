//! User entity created when a contact is first verified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::contact::Contact;

/// User entity representing a verified contact holder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Email address, unique across users
    pub email: Option<String>,

    /// Phone number, unique across users
    pub phone: Option<String>,

    pub email_verified: bool,

    pub phone_verified: bool,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a user for a freshly verified contact
    pub fn from_verified_contact(contact: &Contact, now: DateTime<Utc>) -> Self {
        let mut user = Self {
            id: Uuid::new_v4(),
            email: contact.as_email().map(String::from),
            phone: contact.as_phone().map(String::from),
            email_verified: false,
            phone_verified: false,
            created_at: now,
            updated_at: now,
        };
        user.mark_verified(contact, now);
        user
    }

    /// Sets the verification flag matching the contact. Flags never go back
    /// to false.
    pub fn mark_verified(&mut self, contact: &Contact, now: DateTime<Utc>) {
        match contact {
            Contact::Email(_) => self.email_verified = true,
            Contact::Phone(_) => self.phone_verified = true,
        }
        self.updated_at = now;
    }

    /// Whether this user owns the given contact
    pub fn owns(&self, contact: &Contact) -> bool {
        match contact {
            Contact::Email(email) => self.email.as_deref() == Some(email.as_str()),
            Contact::Phone(phone) => self.phone.as_deref() == Some(phone.as_str()),
        }
    }
}
