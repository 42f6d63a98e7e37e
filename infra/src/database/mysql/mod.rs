//! MySQL repository implementations

pub mod otp_repository_impl;
pub mod user_repository_impl;

pub use otp_repository_impl::MySqlOtpRepository;
pub use user_repository_impl::MySqlUserRepository;

use otp_core::domain::entities::Contact;
use otp_core::errors::DomainError;

/// Column holding a contact of this kind
fn contact_column(contact: &Contact) -> &'static str {
    match contact {
        Contact::Email(_) => "email",
        Contact::Phone(_) => "phone",
    }
}

/// Rebuild a stored contact from its two nullable columns
fn contact_from_columns(
    email: Option<String>,
    phone: Option<String>,
) -> Result<Contact, DomainError> {
    match (email, phone) {
        (Some(email), None) => Ok(Contact::Email(email)),
        (None, Some(phone)) => Ok(Contact::Phone(phone)),
        _ => Err(DomainError::storage(
            "Stored record must carry exactly one of email or phone",
        )),
    }
}

/// Map a driver failure to a storage error, logging the context
fn storage_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| {
        tracing::error!(error = %e, context, "Database operation failed");
        DomainError::storage(format!("{}: {}", context, e))
    }
}

/// MySQL reports lock wait deadlocks with SQLSTATE 40001
fn is_deadlock(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .map_or(false, |code| code == "40001")
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map_or(false, |db| db.is_unique_violation())
}
