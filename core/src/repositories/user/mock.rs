//! In-memory implementation of UserRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{Contact, User};
use crate::errors::DomainError;

use super::r#trait::UserRepository;

/// Mock user repository for testing
#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_contact(&self, contact: &Contact) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.owns(contact)).cloned())
    }

    async fn upsert_verified(
        &self,
        contact: &Contact,
        verified_at: DateTime<Utc>,
    ) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if let Some(user) = users.values_mut().find(|u| u.owns(contact)) {
            user.mark_verified(contact, verified_at);
            return Ok(user.clone());
        }

        let user = User::from_verified_contact(contact, verified_at);
        users.insert(user.id, user.clone());
        Ok(user)
    }
}
