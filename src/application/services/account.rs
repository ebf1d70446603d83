//! Account workflow service
//!
//! Registration, profile updates and the password reset flow. The reset
//! prompt (which carries the one-shot token) goes out through the email
//! sender directly; everything else reaches subscribers through the bus.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info};
use validator::Validate;

use crate::domain::{
    DomainError, DomainResult, PasswordResetRepository, User, UserRepository, UserRole,
};
use crate::events::{
    DomainEvent, EventBus, PasswordResetCompletedEvent, PasswordResetRequestedEvent,
    UserProfileUpdatedEvent, UserRegisteredEvent,
};
use crate::infrastructure::crypto::password::hash_password;
use crate::infrastructure::crypto::reset_token::{generate_reset_token, hash_reset_token};
use crate::notifications::EmailSender;

#[derive(Debug, Clone, Validate)]
pub struct RegisterAccount {
    #[validate(length(min = 1, max = 128, message = "required, at most 128 characters"))]
    pub name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 128, message = "required"))]
    pub password: String,
}

impl RegisterAccount {
    fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.password = self.password.trim().to_string();
        self
    }
}

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    resets: Arc<dyn PasswordResetRepository>,
    email: Arc<dyn EmailSender>,
    events: Arc<dyn EventBus>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        resets: Arc<dyn PasswordResetRepository>,
        email: Arc<dyn EmailSender>,
        events: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            users,
            resets,
            email,
            events,
        }
    }

    pub async fn register(&self, input: RegisterAccount) -> DomainResult<User> {
        let input = input.normalized();
        input.validate()?;

        let password_hash = hash_password(&input.password)
            .map_err(|e| DomainError::Internal(format!("password hashing failed: {e}")))?;

        let user = self
            .users
            .create(User {
                id: 0,
                email: input.email,
                name: input.name,
                password_hash,
                role: UserRole::Student,
                created_at: Utc::now(),
            })
            .await?;

        info!(user_id = user.id, "user registered");
        let _ = self
            .events
            .publish(DomainEvent::UserRegistered(UserRegisteredEvent {
                user_id: user.id,
                email: user.email.clone(),
                name: user.name.clone(),
                occurred_at: Utc::now(),
            }))
            .await;

        Ok(user)
    }

    pub async fn update_profile(&self, user_id: i64, name: &str) -> DomainResult<User> {
        let name = name.trim();
        if name.is_empty() || name.len() > 128 {
            return Err(DomainError::Validation(crate::domain::ValidationFailures {
                fields: vec![crate::domain::FieldFailure {
                    field: "name".to_string(),
                    message: "required, at most 128 characters".to_string(),
                }],
            }));
        }

        let mut user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound("user"))?;

        let old_name = std::mem::replace(&mut user.name, name.to_string());
        self.users.update(user.clone()).await?;

        let _ = self
            .events
            .publish(DomainEvent::UserProfileUpdated(UserProfileUpdatedEvent {
                user_id: user.id,
                old_name,
                new_name: user.name.clone(),
                occurred_at: Utc::now(),
            }))
            .await;

        Ok(user)
    }

    /// Starts a reset flow. Succeeds silently for unknown addresses so the
    /// endpoint cannot be used to probe which emails are registered.
    pub async fn request_password_reset(&self, email: &str, base_url: &str) -> DomainResult<()> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Ok(());
        }

        let user = match self.users.get_by_email(&email).await? {
            Some(user) => user,
            None => {
                debug!("password reset requested for unknown email");
                return Ok(());
            }
        };

        let token = generate_reset_token();
        self.resets
            .create(user.id, hash_reset_token(&token), Utc::now() + Duration::minutes(30))
            .await?;

        let reset_url = format!("{base_url}/reset-password?token={token}");
        self.email
            .send(
                &user.email,
                "Reset your password",
                &format!("Click here to choose a new password: {reset_url}"),
            )
            .await
            .map_err(|e| DomainError::Internal(format!("reset email failed: {e}")))?;

        info!(user_id = user.id, "password reset requested");
        let _ = self
            .events
            .publish(DomainEvent::PasswordResetRequested(
                PasswordResetRequestedEvent {
                    user_id: user.id,
                    email: user.email.clone(),
                    occurred_at: Utc::now(),
                },
            ))
            .await;

        Ok(())
    }

    pub async fn confirm_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let token = token.trim();
        let new_password = new_password.trim();
        if token.is_empty() || new_password.is_empty() {
            return Err(DomainError::Validation(crate::domain::ValidationFailures {
                fields: vec![crate::domain::FieldFailure {
                    field: "token".to_string(),
                    message: "token and new password are required".to_string(),
                }],
            }));
        }

        let user_id = self
            .resets
            .consume(&hash_reset_token(token), Utc::now())
            .await?
            .ok_or(DomainError::NotFound("password reset token"))?;

        let mut user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound("user"))?;

        user.password_hash = hash_password(new_password)
            .map_err(|e| DomainError::Internal(format!("password hashing failed: {e}")))?;
        self.users.update(user.clone()).await?;

        info!(user_id = user.id, "password reset completed");
        let _ = self
            .events
            .publish(DomainEvent::PasswordResetCompleted(
                PasswordResetCompletedEvent {
                    user_id: user.id,
                    occurred_at: Utc::now(),
                },
            ))
            .await;

        Ok(())
    }
}
