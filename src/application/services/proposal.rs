//! Proposal workflow service
//!
//! Owns the proposal state machine. Every mutating operation runs the same
//! guard chain before touching storage: ownership or role, then current
//! status, then field validation. Events go out after the write; a publish
//! failure never rolls the write back.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::domain::access;
use crate::domain::{
    DomainError, DomainResult, Proposal, ProposalRepository, ProposalStatus, UserRepository,
};
use crate::events::{
    DomainEvent, EventBus, ProposalApprovedEvent, ProposalChangesRequestedEvent,
    ProposalCreatedEvent, ProposalDeletedEvent, ProposalRejectedEvent, ProposalSubmittedEvent,
    ProposalUpdatedEvent, ProposalWithdrawnEvent,
};

/// Full desired state of the narrative fields. Updates overwrite all of
/// them; partial updates are not supported.
#[derive(Debug, Clone, Validate)]
pub struct ProposalDraft {
    #[validate(length(min = 4, max = 128, message = "must be between 4 and 128 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 2048, message = "required, at most 2048 characters"))]
    pub summary: String,
    #[validate(length(max = 2048, message = "must be at most 2048 characters"))]
    pub qualifications: String,
    #[validate(length(max = 2048, message = "must be at most 2048 characters"))]
    pub target_audience: String,
    #[validate(length(max = 2048, message = "must be at most 2048 characters"))]
    pub learning_objectives: String,
    #[validate(length(max = 2048, message = "must be at most 2048 characters"))]
    pub outline: String,
    #[validate(length(max = 2048, message = "must be at most 2048 characters"))]
    pub assumed_prerequisites: String,
}

impl ProposalDraft {
    fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.summary = self.summary.trim().to_string();
        self.qualifications = self.qualifications.trim().to_string();
        self.target_audience = self.target_audience.trim().to_string();
        self.learning_objectives = self.learning_objectives.trim().to_string();
        self.outline = self.outline.trim().to_string();
        self.assumed_prerequisites = self.assumed_prerequisites.trim().to_string();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
    RequestChanges,
}

#[derive(Debug, Clone, Validate)]
pub struct ReviewProposal {
    pub proposal_id: i64,
    pub reviewer_id: i64,
    pub decision: ReviewDecision,
    #[validate(length(max = 2048, message = "must be at most 2048 characters"))]
    pub notes: String,
}

pub struct ProposalService {
    proposals: Arc<dyn ProposalRepository>,
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventBus>,
}

impl ProposalService {
    pub fn new(
        proposals: Arc<dyn ProposalRepository>,
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            proposals,
            users,
            events,
        }
    }

    pub async fn create(&self, author_id: i64, draft: ProposalDraft) -> DomainResult<Proposal> {
        let draft = draft.normalized();
        draft.validate()?;

        let proposal = Proposal {
            id: 0,
            author_id,
            title: draft.title,
            summary: draft.summary,
            qualifications: draft.qualifications,
            target_audience: draft.target_audience,
            learning_objectives: draft.learning_objectives,
            outline: draft.outline,
            assumed_prerequisites: draft.assumed_prerequisites,
            reviewer_id: None,
            review_notes: String::new(),
            status: ProposalStatus::Draft,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let proposal = self.proposals.create(proposal).await?;

        info!(proposal_id = proposal.id, author_id, "proposal created");
        let _ = self
            .events
            .publish(DomainEvent::ProposalCreated(ProposalCreatedEvent {
                proposal_id: proposal.id,
                author_id: proposal.author_id,
                title: proposal.title.clone(),
                occurred_at: Utc::now(),
            }))
            .await;

        Ok(proposal)
    }

    pub async fn update(
        &self,
        actor_id: i64,
        proposal_id: i64,
        draft: ProposalDraft,
    ) -> DomainResult<Proposal> {
        let mut proposal = self
            .fetch_authorized(proposal_id, |p| access::can_amend_proposal(actor_id, p))
            .await?;

        if !proposal.is_amendable() {
            return Err(DomainError::InvalidStatusTransition {
                action: "update",
                status: proposal.status.to_string(),
            });
        }

        let draft = draft.normalized();
        draft.validate()?;

        proposal.title = draft.title;
        proposal.summary = draft.summary;
        proposal.qualifications = draft.qualifications;
        proposal.target_audience = draft.target_audience;
        proposal.learning_objectives = draft.learning_objectives;
        proposal.outline = draft.outline;
        proposal.assumed_prerequisites = draft.assumed_prerequisites;

        self.proposals.update(proposal.clone()).await?;

        let _ = self
            .events
            .publish(DomainEvent::ProposalUpdated(ProposalUpdatedEvent {
                proposal_id: proposal.id,
                author_id: proposal.author_id,
                title: proposal.title.clone(),
                occurred_at: Utc::now(),
            }))
            .await;

        Ok(proposal)
    }

    pub async fn submit(&self, actor_id: i64, proposal_id: i64) -> DomainResult<Proposal> {
        let mut proposal = self
            .fetch_authorized(proposal_id, |p| access::can_submit_proposal(actor_id, p))
            .await?;

        if !proposal.is_amendable() {
            return Err(DomainError::InvalidStatusTransition {
                action: "submit",
                status: proposal.status.to_string(),
            });
        }

        let old_status = proposal.status;
        proposal.status = ProposalStatus::Submitted;
        self.proposals.update(proposal.clone()).await?;

        info!(proposal_id, author_id = proposal.author_id, "proposal submitted");
        let _ = self
            .events
            .publish(DomainEvent::ProposalSubmitted(ProposalSubmittedEvent {
                proposal_id: proposal.id,
                author_id: proposal.author_id,
                title: proposal.title.clone(),
                old_status,
                occurred_at: Utc::now(),
            }))
            .await;

        Ok(proposal)
    }

    pub async fn withdraw(&self, actor_id: i64, proposal_id: i64) -> DomainResult<Proposal> {
        let mut proposal = self
            .fetch_authorized(proposal_id, |p| access::can_withdraw_proposal(actor_id, p))
            .await?;

        if proposal.status != ProposalStatus::Submitted {
            return Err(DomainError::InvalidStatusTransition {
                action: "withdraw",
                status: proposal.status.to_string(),
            });
        }

        proposal.status = ProposalStatus::Withdrawn;
        self.proposals.update(proposal.clone()).await?;

        info!(proposal_id, author_id = proposal.author_id, "proposal withdrawn");
        let _ = self
            .events
            .publish(DomainEvent::ProposalWithdrawn(ProposalWithdrawnEvent {
                proposal_id: proposal.id,
                author_id: proposal.author_id,
                occurred_at: Utc::now(),
            }))
            .await;

        Ok(proposal)
    }

    pub async fn review(&self, input: ReviewProposal) -> DomainResult<Proposal> {
        let mut proposal = self
            .proposals
            .get_by_id(input.proposal_id)
            .await?
            .ok_or(DomainError::NotFound("proposal"))?;

        let reviewer = self
            .users
            .get_by_id(input.reviewer_id)
            .await?
            .filter(access::can_review_proposals)
            // A proposal outside the actor's reach looks missing.
            .ok_or(DomainError::NotFound("proposal"))?;

        if proposal.status != ProposalStatus::Submitted {
            return Err(DomainError::InvalidStatusTransition {
                action: "review",
                status: proposal.status.to_string(),
            });
        }

        input.validate()?;

        proposal.reviewer_id = Some(reviewer.id);
        proposal.review_notes = input.notes.trim().to_string();

        let event = match input.decision {
            ReviewDecision::Approve => {
                proposal.status = ProposalStatus::Approved;
                DomainEvent::ProposalApproved(ProposalApprovedEvent {
                    proposal_id: proposal.id,
                    author_id: proposal.author_id,
                    reviewer_id: reviewer.id,
                    title: proposal.title.clone(),
                    occurred_at: Utc::now(),
                })
            }
            ReviewDecision::Reject => {
                proposal.status = ProposalStatus::Rejected;
                DomainEvent::ProposalRejected(ProposalRejectedEvent {
                    proposal_id: proposal.id,
                    author_id: proposal.author_id,
                    reviewer_id: reviewer.id,
                    title: proposal.title.clone(),
                    occurred_at: Utc::now(),
                })
            }
            ReviewDecision::RequestChanges => {
                proposal.status = ProposalStatus::ChangesRequested;
                DomainEvent::ProposalChangesRequested(ProposalChangesRequestedEvent {
                    proposal_id: proposal.id,
                    author_id: proposal.author_id,
                    reviewer_id: reviewer.id,
                    title: proposal.title.clone(),
                    occurred_at: Utc::now(),
                })
            }
        };

        self.proposals.update(proposal.clone()).await?;

        info!(
            proposal_id = proposal.id,
            reviewer_id = reviewer.id,
            status = %proposal.status,
            "proposal reviewed"
        );
        let _ = self.events.publish(event).await;

        Ok(proposal)
    }

    pub async fn delete(&self, actor_id: i64, proposal_id: i64) -> DomainResult<()> {
        let proposal = self
            .fetch_authorized(proposal_id, |p| access::can_delete_proposal(actor_id, p))
            .await?;

        self.proposals.delete_by_id(proposal_id).await?;

        info!(proposal_id, author_id = proposal.author_id, "proposal deleted");
        let _ = self
            .events
            .publish(DomainEvent::ProposalDeleted(ProposalDeletedEvent {
                proposal_id: proposal.id,
                author_id: proposal.author_id,
                status: proposal.status,
                occurred_at: Utc::now(),
            }))
            .await;

        Ok(())
    }

    pub async fn get_by_id(&self, actor_id: i64, proposal_id: i64) -> DomainResult<Proposal> {
        let actor = self
            .users
            .get_by_id(actor_id)
            .await?
            .ok_or(DomainError::NotFound("user"))?;

        let proposal = self
            .proposals
            .get_by_id(proposal_id)
            .await?
            .ok_or(DomainError::NotFound("proposal"))?;

        if !access::can_view_proposal(&actor, &proposal) {
            return Err(DomainError::NotFound("proposal"));
        }

        Ok(proposal)
    }

    pub async fn list_mine(&self, author_id: i64) -> DomainResult<Vec<Proposal>> {
        self.proposals.list_by_author(author_id).await
    }

    /// The review queue. Admin only.
    pub async fn list_submitted(&self, actor_id: i64) -> DomainResult<Vec<Proposal>> {
        let actor = self
            .users
            .get_by_id(actor_id)
            .await?
            .ok_or(DomainError::NotFound("user"))?;

        if !access::can_list_submitted(&actor) {
            return Err(DomainError::Forbidden("only admins may view the review queue"));
        }

        self.proposals.list_all_submitted().await
    }

    /// Loads a proposal, hiding it when the predicate rejects the actor.
    /// A foreign proposal is indistinguishable from a missing one.
    async fn fetch_authorized(
        &self,
        proposal_id: i64,
        allowed: impl Fn(&Proposal) -> bool,
    ) -> DomainResult<Proposal> {
        let proposal = self
            .proposals
            .get_by_id(proposal_id)
            .await?
            .ok_or(DomainError::NotFound("proposal"))?;

        if !allowed(&proposal) {
            return Err(DomainError::NotFound("proposal"));
        }

        Ok(proposal)
    }
}
