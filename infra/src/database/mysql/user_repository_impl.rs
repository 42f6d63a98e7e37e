//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use otp_core::domain::entities::{Contact, User};
use otp_core::errors::DomainError;
use otp_core::repositories::UserRepository;

use super::{contact_column, is_unique_violation, storage_error};

const SELECT_COLUMNS: &str = r#"
    SELECT id, email, phone, email_verified, phone_verified,
           created_at, updated_at
    FROM users
"#;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

/// Outcome of one upsert transaction
enum Upsert {
    Done(User),
    /// A concurrent verification created the user first
    Conflict,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to User entity
    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        let column = |name: &'static str| {
            move |e: sqlx::Error| DomainError::storage(format!("Failed to get {}: {}", name, e))
        };

        let id: String = row.try_get("id").map_err(column("id"))?;

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::storage(format!("Invalid UUID: {}", e)))?,
            email: row.try_get("email").map_err(column("email"))?,
            phone: row.try_get("phone").map_err(column("phone"))?,
            email_verified: row
                .try_get("email_verified")
                .map_err(column("email_verified"))?,
            phone_verified: row
                .try_get("phone_verified")
                .map_err(column("phone_verified"))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(column("created_at"))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(column("updated_at"))?,
        })
    }

    async fn try_upsert(
        &self,
        contact: &Contact,
        verified_at: DateTime<Utc>,
    ) -> Result<Upsert, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "{} WHERE {} = ? LIMIT 1 FOR UPDATE",
            SELECT_COLUMNS,
            contact_column(contact)
        );
        let existing = sqlx::query(&query)
            .bind(contact.value())
            .fetch_optional(&mut *tx)
            .await?;

        let user = match existing {
            Some(row) => {
                let mut user = Self::row_to_user(&row).map_err(|e| sqlx::Error::Decode(e.into()))?;
                user.mark_verified(contact, verified_at);

                let flag = match contact {
                    Contact::Email(_) => "email_verified",
                    Contact::Phone(_) => "phone_verified",
                };
                let update = format!(
                    "UPDATE users SET {} = TRUE, updated_at = ? WHERE id = ?",
                    flag
                );
                sqlx::query(&update)
                    .bind(user.updated_at)
                    .bind(user.id.to_string())
                    .execute(&mut *tx)
                    .await?;
                user
            }
            None => {
                let user = User::from_verified_contact(contact, verified_at);
                let insert = sqlx::query(
                    r#"
                    INSERT INTO users (
                        id, email, phone, email_verified, phone_verified,
                        created_at, updated_at
                    ) VALUES (?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(user.id.to_string())
                .bind(&user.email)
                .bind(&user.phone)
                .bind(user.email_verified)
                .bind(user.phone_verified)
                .bind(user.created_at)
                .bind(user.updated_at)
                .execute(&mut *tx)
                .await;

                match insert {
                    Ok(_) => user,
                    Err(e) if is_unique_violation(&e) => {
                        tx.rollback().await?;
                        return Ok(Upsert::Conflict);
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        tx.commit().await?;
        Ok(Upsert::Done(user))
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = format!("{} WHERE id = ? LIMIT 1", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Failed to load user"))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_contact(&self, contact: &Contact) -> Result<Option<User>, DomainError> {
        let query = format!(
            "{} WHERE {} = ? LIMIT 1",
            SELECT_COLUMNS,
            contact_column(contact)
        );

        let row = sqlx::query(&query)
            .bind(contact.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Failed to load user"))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn upsert_verified(
        &self,
        contact: &Contact,
        verified_at: DateTime<Utc>,
    ) -> Result<User, DomainError> {
        // A lost insert race leaves the row in place, so the second pass updates it
        for _ in 0..2 {
            match self
                .try_upsert(contact, verified_at)
                .await
                .map_err(storage_error("Failed to upsert verified user"))?
            {
                Upsert::Done(user) => {
                    tracing::debug!(user_id = %user.id, contact = %contact, "Recorded verified contact");
                    return Ok(user);
                }
                Upsert::Conflict => continue,
            }
        }

        Err(DomainError::storage(
            "Failed to upsert verified user: concurrent writers kept conflicting",
        ))
    }
}
