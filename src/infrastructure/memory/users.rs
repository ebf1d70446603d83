//! In-memory user store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{DomainError, DomainResult, PasswordResetRepository, User, UserRepository};

#[derive(Default)]
struct Inner {
    by_id: HashMap<i64, User>,
    id_by_email: HashMap<String, i64>,
    next_id: i64,
}

/// Map-backed user store with a secondary email index.
pub struct InMemoryUserStore {
    inner: RwLock<Inner>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn create(&self, mut user: User) -> DomainResult<User> {
        let mut inner = self.inner.write().await;

        let key = email_key(&user.email);
        if key.is_empty() {
            return Err(DomainError::Storage("email required".to_string()));
        }
        if inner.id_by_email.contains_key(&key) {
            return Err(DomainError::Conflict(format!(
                "email {key} is already registered"
            )));
        }

        user.id = inner.next_id;
        user.email = key.clone();
        user.created_at = Utc::now();
        inner.next_id += 1;

        inner.id_by_email.insert(key, user.id);
        inner.by_id.insert(user.id, user.clone());

        Ok(user)
    }

    async fn get_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.by_id.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let inner = self.inner.read().await;
        let id = inner.id_by_email.get(&email_key(email));
        Ok(id.and_then(|id| inner.by_id.get(id)).cloned())
    }

    async fn update(&self, mut user: User) -> DomainResult<()> {
        let mut inner = self.inner.write().await;

        let previous = match inner.by_id.get(&user.id) {
            Some(existing) => existing.clone(),
            None => return Err(DomainError::NotFound("user")),
        };

        let key = email_key(&user.email);
        if let Some(&owner) = inner.id_by_email.get(&key) {
            if owner != user.id {
                return Err(DomainError::Conflict(format!(
                    "email {key} is already registered"
                )));
            }
        }

        user.email = key.clone();
        inner.id_by_email.remove(&email_key(&previous.email));
        inner.id_by_email.insert(key, user.id);
        inner.by_id.insert(user.id, user);

        Ok(())
    }
}

struct ResetEntry {
    user_id: i64,
    expires_at: DateTime<Utc>,
}

/// Reset tokens keyed by their hash, consumed on first use.
pub struct InMemoryPasswordResetStore {
    tokens: RwLock<HashMap<String, ResetEntry>>,
}

impl InMemoryPasswordResetStore {
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPasswordResetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordResetRepository for InMemoryPasswordResetStore {
    async fn create(
        &self,
        user_id: i64,
        token_hash: String,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let mut tokens = self.tokens.write().await;
        tokens.insert(
            token_hash,
            ResetEntry {
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn consume(&self, token_hash: &str, now: DateTime<Utc>) -> DomainResult<Option<i64>> {
        let mut tokens = self.tokens.write().await;
        match tokens.remove(token_hash) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.user_id)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::UserRole;

    fn user(email: &str) -> User {
        User {
            id: 0,
            email: email.to_string(),
            name: "Someone".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::Student,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn duplicate_emails_conflict_regardless_of_case() {
        let store = InMemoryUserStore::new();
        store.create(user("grace@example.com")).await.unwrap();

        let err = store.create(user("GRACE@example.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_unknown_user_is_not_found() {
        let store = InMemoryUserStore::new();
        let mut ghost = user("ghost@example.com");
        ghost.id = 99;

        let err = store.update(ghost).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_cannot_steal_anothers_email() {
        let store = InMemoryUserStore::new();
        let a = store.create(user("a@example.com")).await.unwrap();
        store.create(user("b@example.com")).await.unwrap();

        let mut renamed = a.clone();
        renamed.email = "b@example.com".to_string();
        let err = store.update(renamed).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Changing to a fresh address frees the old one.
        let mut moved = a;
        moved.email = "c@example.com".to_string();
        store.update(moved).await.unwrap();
        assert!(store.get_by_email("a@example.com").await.unwrap().is_none());
        assert!(store.get_by_email("c@example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn reset_tokens_are_single_use_and_expire() {
        let store = InMemoryPasswordResetStore::new();
        let now = Utc::now();

        store
            .create(1, "hash-a".to_string(), now + Duration::minutes(30))
            .await
            .unwrap();
        assert_eq!(store.consume("hash-a", now).await.unwrap(), Some(1));
        assert_eq!(store.consume("hash-a", now).await.unwrap(), None);

        store
            .create(2, "hash-b".to_string(), now - Duration::minutes(1))
            .await
            .unwrap();
        assert_eq!(store.consume("hash-b", now).await.unwrap(), None);
    }
}
