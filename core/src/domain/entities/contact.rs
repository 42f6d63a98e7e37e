//! Contact value: the email address or phone number being verified.

use serde::{Deserialize, Serialize};

use otp_shared::utils::phone::{is_valid_phone, PHONE_MAX_LENGTH, PHONE_MIN_LENGTH};
use otp_shared::utils::{mask_email, mask_phone_number, validation::validators};

use crate::errors::ValidationError;

/// Which channel a contact belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Email,
    Phone,
}

/// Exactly one email address or phone number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Contact {
    Email(String),
    Phone(String),
}

impl Contact {
    /// Build a contact from the optional request fields.
    ///
    /// Blank values count as absent. Fails when neither or both are given,
    /// when the email is malformed, or when the phone is outside 10–15
    /// characters.
    pub fn from_parts(email: Option<&str>, phone: Option<&str>) -> Result<Self, ValidationError> {
        let email = email.map(str::trim).filter(|v| !v.is_empty());
        let phone = phone.map(str::trim).filter(|v| !v.is_empty());

        match (email, phone) {
            (None, None) => Err(ValidationError::MissingContact),
            (Some(_), Some(_)) => Err(ValidationError::ConflictingContact),
            (Some(email), None) => Self::email(email),
            (None, Some(phone)) => Self::phone(phone),
        }
    }

    /// Validated email contact
    pub fn email(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        if !validators::is_valid_email(value) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(Contact::Email(value.to_string()))
    }

    /// Validated phone contact
    pub fn phone(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        if !is_valid_phone(value) {
            return Err(ValidationError::InvalidPhoneLength {
                min: PHONE_MIN_LENGTH,
                max: PHONE_MAX_LENGTH,
            });
        }
        Ok(Contact::Phone(value.to_string()))
    }

    /// Re-run the channel checks on a contact built directly from its variants
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Contact::Email(v) => Self::email(v).map(|_| ()),
            Contact::Phone(v) => Self::phone(v).map(|_| ()),
        }
    }

    pub fn kind(&self) -> ContactKind {
        match self {
            Contact::Email(_) => ContactKind::Email,
            Contact::Phone(_) => ContactKind::Phone,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Contact::Email(v) | Contact::Phone(v) => v,
        }
    }

    pub fn as_email(&self) -> Option<&str> {
        match self {
            Contact::Email(v) => Some(v),
            Contact::Phone(_) => None,
        }
    }

    pub fn as_phone(&self) -> Option<&str> {
        match self {
            Contact::Phone(v) => Some(v),
            Contact::Email(_) => None,
        }
    }

    /// Log-safe rendering
    pub fn masked(&self) -> String {
        match self {
            Contact::Email(v) => mask_email(v),
            Contact::Phone(v) => mask_phone_number(v),
        }
    }
}

impl std::fmt::Display for Contact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.masked())
    }
}
