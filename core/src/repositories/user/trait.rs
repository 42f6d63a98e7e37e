//! User repository trait defining the interface for user data persistence.
//!
//! Users only come into existence through a successful verification, so the
//! write side is a single upsert keyed by contact.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{Contact, User};
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use chrono::{DateTime, Utc};
/// use uuid::Uuid;
/// use otp_core::repositories::UserRepository;
/// use otp_core::domain::entities::{Contact, User};
/// use otp_core::errors::DomainError;
///
/// struct InMemoryUsers;
///
/// #[async_trait]
/// impl UserRepository for InMemoryUsers {
///     async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///
///     async fn find_by_contact(&self, _contact: &Contact) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///
///     async fn upsert_verified(
///         &self,
///         contact: &Contact,
///         verified_at: DateTime<Utc>,
///     ) -> Result<User, DomainError> {
///         Ok(User::from_verified_contact(contact, verified_at))
///     }
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find the user owning an email address or phone number
    async fn find_by_contact(&self, contact: &Contact) -> Result<Option<User>, DomainError>;

    /// Record a successful verification of `contact`.
    ///
    /// Creates the user if none owns the contact yet, otherwise sets the
    /// matching verified flag. Never clears a flag.
    ///
    /// # Returns
    /// * `Ok(User)` - The user after the update
    /// * `Err(DomainError)` - Storage failure
    async fn upsert_verified(
        &self,
        contact: &Contact,
        verified_at: DateTime<Utc>,
    ) -> Result<User, DomainError>;
}
