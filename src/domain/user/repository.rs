use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::User;
use crate::domain::DomainResult;

/// Persistence contract for user accounts.
///
/// Implementations return copies; callers never observe shared mutable state.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Assigns the id and creation timestamp. Fails with `Conflict` when the
    /// email is already registered.
    async fn create(&self, user: User) -> DomainResult<User>;

    async fn get_by_id(&self, id: i64) -> DomainResult<Option<User>>;
    async fn get_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Overwrites the stored user. Fails with `NotFound` for an unknown id
    /// and with `Conflict` when the new email collides with another account.
    async fn update(&self, user: User) -> DomainResult<()>;
}

/// One-shot password reset tokens, stored hashed.
#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    async fn create(
        &self,
        user_id: i64,
        token_hash: String,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<()>;

    /// Consumes the token if it exists and has not expired, returning the
    /// owning user id. A consumed or expired token yields `None`.
    async fn consume(&self, token_hash: &str, now: DateTime<Utc>) -> DomainResult<Option<i64>>;
}
