//! Email-sending event subscribers
//!
//! Registered once at startup. Handler errors stay inside the bus: a failed
//! email never reaches the workflow that triggered it.

use std::sync::Arc;

use async_trait::async_trait;

use super::EmailSender;
use crate::domain::UserRepository;
use crate::events::{DomainEvent, EventBus, EventHandler};

/// Greets every new account.
struct WelcomeEmail {
    email: Arc<dyn EmailSender>,
}

#[async_trait]
impl EventHandler for WelcomeEmail {
    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
        if let DomainEvent::UserRegistered(e) = event {
            self.email
                .send(
                    &e.email,
                    "Welcome to the course marketplace",
                    &format!("Hi {}, your account is ready.", e.name),
                )
                .await?;
        }
        Ok(())
    }
}

/// Tells the author how a review ended. Events carry ids only, so the
/// author's address is resolved through the user repository.
struct ReviewOutcomeEmail {
    email: Arc<dyn EmailSender>,
    users: Arc<dyn UserRepository>,
}

impl ReviewOutcomeEmail {
    fn outcome(event: &DomainEvent) -> Option<(i64, &str, &str)> {
        match event {
            DomainEvent::ProposalApproved(e) => Some((
                e.author_id,
                e.title.as_str(),
                "was approved. You can now create the course.",
            )),
            DomainEvent::ProposalRejected(e) => {
                Some((e.author_id, e.title.as_str(), "was rejected."))
            }
            DomainEvent::ProposalChangesRequested(e) => Some((
                e.author_id,
                e.title.as_str(),
                "needs changes before it can be approved.",
            )),
            _ => None,
        }
    }
}

#[async_trait]
impl EventHandler for ReviewOutcomeEmail {
    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
        let Some((author_id, title, outcome)) = Self::outcome(event) else {
            return Ok(());
        };

        let author = self
            .users
            .get_by_id(author_id)
            .await
            .map_err(|e| anyhow::anyhow!("author lookup failed: {e}"))?
            .ok_or_else(|| anyhow::anyhow!("author {author_id} no longer exists"))?;

        self.email
            .send(
                &author.email,
                "Your course proposal was reviewed",
                &format!("Your proposal \"{title}\" {outcome}"),
            )
            .await
    }
}

/// Wire the email handlers onto the bus. Call once during startup.
pub fn register_email_subscribers(
    bus: &dyn EventBus,
    email: Arc<dyn EmailSender>,
    users: Arc<dyn UserRepository>,
) {
    bus.subscribe(
        "user.registered",
        Arc::new(WelcomeEmail {
            email: email.clone(),
        }),
    );

    let outcome = Arc::new(ReviewOutcomeEmail { email, users });
    bus.subscribe("proposal.approved", outcome.clone());
    bus.subscribe("proposal.rejected", outcome.clone());
    bus.subscribe("proposal.changes_requested", outcome);
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::domain::{User, UserRole};
    use crate::events::{ProposalApprovedEvent, SyncEventBus, UserRegisteredEvent};
    use crate::infrastructure::memory::InMemoryUserStore;

    #[derive(Default)]
    struct RecordingSender {
        mails: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl EmailSender for RecordingSender {
        async fn send(&self, to: &str, subject: &str, _body: &str) -> anyhow::Result<()> {
            self.mails
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn welcome_and_review_outcome_emails_go_out() {
        let users = Arc::new(InMemoryUserStore::new());
        let author = users
            .create(User {
                id: 0,
                email: "author@example.com".to_string(),
                name: "Author".to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::Instructor,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let sender = Arc::new(RecordingSender::default());
        let bus = SyncEventBus::new();
        register_email_subscribers(&bus, sender.clone(), users);

        bus.publish(DomainEvent::UserRegistered(UserRegisteredEvent {
            user_id: author.id,
            email: author.email.clone(),
            name: author.name.clone(),
            occurred_at: Utc::now(),
        }))
        .await
        .unwrap();

        bus.publish(DomainEvent::ProposalApproved(ProposalApprovedEvent {
            proposal_id: 1,
            author_id: author.id,
            reviewer_id: 2,
            title: "Intro to Go".to_string(),
            occurred_at: Utc::now(),
        }))
        .await
        .unwrap();

        let mails = sender.mails.lock().unwrap();
        assert_eq!(mails.len(), 2);
        assert_eq!(mails[0].0, "author@example.com");
        assert!(mails[1].1.contains("reviewed"));
    }
}
