//! Domain event catalog
//!
//! Every completed state change is recorded as one immutable variant of
//! [`DomainEvent`]. Payloads carry identifying fields only, never the full
//! entity, and are stamped with `occurred_at` when constructed. The
//! dot-namespaced name doubles as the bus routing key and the serialized tag,
//! so subscribers see the same contract on both sides.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ProposalStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum DomainEvent {
    #[serde(rename = "user.registered")]
    UserRegistered(UserRegisteredEvent),
    #[serde(rename = "user.profile_updated")]
    UserProfileUpdated(UserProfileUpdatedEvent),
    #[serde(rename = "user.password_reset_requested")]
    PasswordResetRequested(PasswordResetRequestedEvent),
    #[serde(rename = "user.password_reset_completed")]
    PasswordResetCompleted(PasswordResetCompletedEvent),

    #[serde(rename = "proposal.created")]
    ProposalCreated(ProposalCreatedEvent),
    #[serde(rename = "proposal.updated")]
    ProposalUpdated(ProposalUpdatedEvent),
    #[serde(rename = "proposal.submitted")]
    ProposalSubmitted(ProposalSubmittedEvent),
    #[serde(rename = "proposal.withdrawn")]
    ProposalWithdrawn(ProposalWithdrawnEvent),
    #[serde(rename = "proposal.approved")]
    ProposalApproved(ProposalApprovedEvent),
    #[serde(rename = "proposal.rejected")]
    ProposalRejected(ProposalRejectedEvent),
    #[serde(rename = "proposal.changes_requested")]
    ProposalChangesRequested(ProposalChangesRequestedEvent),
    #[serde(rename = "proposal.deleted")]
    ProposalDeleted(ProposalDeletedEvent),

    #[serde(rename = "course.created_from_proposal")]
    CourseCreatedFromProposal(CourseCreatedFromProposalEvent),
    #[serde(rename = "course.updated")]
    CourseUpdated(CourseUpdatedEvent),
    #[serde(rename = "course.published")]
    CoursePublished(CoursePublishedEvent),

    #[serde(rename = "module.created")]
    ModuleCreated(ModuleCreatedEvent),
    #[serde(rename = "module.updated")]
    ModuleUpdated(ModuleUpdatedEvent),
    #[serde(rename = "module.published")]
    ModulePublished(ModulePublishedEvent),
    #[serde(rename = "module.deleted")]
    ModuleDeleted(ModuleDeletedEvent),

    #[serde(rename = "content.created")]
    ContentCreated(ContentCreatedEvent),
    #[serde(rename = "content.updated")]
    ContentUpdated(ContentUpdatedEvent),
    #[serde(rename = "content.published")]
    ContentPublished(ContentPublishedEvent),
    #[serde(rename = "content.deleted")]
    ContentDeleted(ContentDeletedEvent),
}

impl DomainEvent {
    /// Stable dot-namespaced name, used as the bus routing key and log key.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::UserRegistered(_) => "user.registered",
            Self::UserProfileUpdated(_) => "user.profile_updated",
            Self::PasswordResetRequested(_) => "user.password_reset_requested",
            Self::PasswordResetCompleted(_) => "user.password_reset_completed",
            Self::ProposalCreated(_) => "proposal.created",
            Self::ProposalUpdated(_) => "proposal.updated",
            Self::ProposalSubmitted(_) => "proposal.submitted",
            Self::ProposalWithdrawn(_) => "proposal.withdrawn",
            Self::ProposalApproved(_) => "proposal.approved",
            Self::ProposalRejected(_) => "proposal.rejected",
            Self::ProposalChangesRequested(_) => "proposal.changes_requested",
            Self::ProposalDeleted(_) => "proposal.deleted",
            Self::CourseCreatedFromProposal(_) => "course.created_from_proposal",
            Self::CourseUpdated(_) => "course.updated",
            Self::CoursePublished(_) => "course.published",
            Self::ModuleCreated(_) => "module.created",
            Self::ModuleUpdated(_) => "module.updated",
            Self::ModulePublished(_) => "module.published",
            Self::ModuleDeleted(_) => "module.deleted",
            Self::ContentCreated(_) => "content.created",
            Self::ContentUpdated(_) => "content.updated",
            Self::ContentPublished(_) => "content.published",
            Self::ContentDeleted(_) => "content.deleted",
        }
    }

    /// Business time of the state change this event records.
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::UserRegistered(e) => e.occurred_at,
            Self::UserProfileUpdated(e) => e.occurred_at,
            Self::PasswordResetRequested(e) => e.occurred_at,
            Self::PasswordResetCompleted(e) => e.occurred_at,
            Self::ProposalCreated(e) => e.occurred_at,
            Self::ProposalUpdated(e) => e.occurred_at,
            Self::ProposalSubmitted(e) => e.occurred_at,
            Self::ProposalWithdrawn(e) => e.occurred_at,
            Self::ProposalApproved(e) => e.occurred_at,
            Self::ProposalRejected(e) => e.occurred_at,
            Self::ProposalChangesRequested(e) => e.occurred_at,
            Self::ProposalDeleted(e) => e.occurred_at,
            Self::CourseCreatedFromProposal(e) => e.occurred_at,
            Self::CourseUpdated(e) => e.occurred_at,
            Self::CoursePublished(e) => e.occurred_at,
            Self::ModuleCreated(e) => e.occurred_at,
            Self::ModuleUpdated(e) => e.occurred_at,
            Self::ModulePublished(e) => e.occurred_at,
            Self::ModuleDeleted(e) => e.occurred_at,
            Self::ContentCreated(e) => e.occurred_at,
            Self::ContentUpdated(e) => e.occurred_at,
            Self::ContentPublished(e) => e.occurred_at,
            Self::ContentDeleted(e) => e.occurred_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRegisteredEvent {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileUpdatedEvent {
    pub user_id: i64,
    pub old_name: String,
    pub new_name: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetRequestedEvent {
    pub user_id: i64,
    pub email: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetCompletedEvent {
    pub user_id: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalCreatedEvent {
    pub proposal_id: i64,
    pub author_id: i64,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalUpdatedEvent {
    pub proposal_id: i64,
    pub author_id: i64,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalSubmittedEvent {
    pub proposal_id: i64,
    pub author_id: i64,
    pub title: String,
    /// Status the proposal left (draft or changes_requested)
    pub old_status: ProposalStatus,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalWithdrawnEvent {
    pub proposal_id: i64,
    pub author_id: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalApprovedEvent {
    pub proposal_id: i64,
    pub author_id: i64,
    pub reviewer_id: i64,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalRejectedEvent {
    pub proposal_id: i64,
    pub author_id: i64,
    pub reviewer_id: i64,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalChangesRequestedEvent {
    pub proposal_id: i64,
    pub author_id: i64,
    pub reviewer_id: i64,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalDeletedEvent {
    pub proposal_id: i64,
    pub author_id: i64,
    /// Status at the moment of deletion
    pub status: ProposalStatus,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseCreatedFromProposalEvent {
    pub course_id: i64,
    pub proposal_id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseUpdatedEvent {
    pub course_id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoursePublishedEvent {
    pub course_id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleCreatedEvent {
    pub module_id: i64,
    pub course_id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub position: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleUpdatedEvent {
    pub module_id: i64,
    pub course_id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulePublishedEvent {
    pub module_id: i64,
    pub course_id: i64,
    pub instructor_id: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDeletedEvent {
    pub module_id: i64,
    pub course_id: i64,
    pub instructor_id: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentCreatedEvent {
    pub content_id: i64,
    pub module_id: i64,
    pub course_id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentUpdatedEvent {
    pub content_id: i64,
    pub module_id: i64,
    pub course_id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPublishedEvent {
    pub content_id: i64,
    pub module_id: i64,
    pub course_id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDeletedEvent {
    pub content_id: i64,
    pub module_id: i64,
    pub course_id: i64,
    pub instructor_id: i64,
    pub occurred_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_tag_matches_routing_key() {
        let samples = vec![
            DomainEvent::UserRegistered(UserRegisteredEvent {
                user_id: 1,
                email: "a@example.com".to_string(),
                name: "A".to_string(),
                occurred_at: Utc::now(),
            }),
            DomainEvent::ProposalSubmitted(ProposalSubmittedEvent {
                proposal_id: 10,
                author_id: 42,
                title: "Intro to Go".to_string(),
                old_status: ProposalStatus::Draft,
                occurred_at: Utc::now(),
            }),
            DomainEvent::CourseCreatedFromProposal(CourseCreatedFromProposalEvent {
                course_id: 5,
                proposal_id: 10,
                instructor_id: 42,
                title: "Intro to Go".to_string(),
                occurred_at: Utc::now(),
            }),
            DomainEvent::ContentPublished(ContentPublishedEvent {
                content_id: 3,
                module_id: 2,
                course_id: 5,
                instructor_id: 42,
                title: "Lesson 1".to_string(),
                occurred_at: Utc::now(),
            }),
        ];

        for event in samples {
            let json: serde_json::Value = serde_json::to_value(&event).unwrap();
            assert_eq!(json["event"], event.event_name());
        }
    }

    #[test]
    fn submitted_event_keeps_the_previous_status() {
        let event = DomainEvent::ProposalSubmitted(ProposalSubmittedEvent {
            proposal_id: 10,
            author_id: 42,
            title: "Intro to Go".to_string(),
            old_status: ProposalStatus::ChangesRequested,
            occurred_at: Utc::now(),
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["payload"]["old_status"], "changes_requested");
    }
}
