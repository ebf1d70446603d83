//! Course proposal domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Draft,
    Submitted,
    Withdrawn,
    Approved,
    Rejected,
    ChangesRequested,
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Submitted => write!(f, "submitted"),
            Self::Withdrawn => write!(f, "withdrawn"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
            Self::ChangesRequested => write!(f, "changes_requested"),
        }
    }
}

/// An instructor's pitch for a new course, reviewed before it becomes a Course
#[derive(Debug, Clone)]
pub struct Proposal {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub summary: String,
    pub qualifications: String,
    pub target_audience: String,
    pub learning_objectives: String,
    pub outline: String,
    pub assumed_prerequisites: String,
    /// Set by the first review decision, never cleared afterwards
    pub reviewer_id: Option<i64>,
    pub review_notes: String,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Proposal {
    /// True once the proposal has entered (or passed through) review.
    pub fn was_submitted(&self) -> bool {
        matches!(
            self.status,
            ProposalStatus::Submitted
                | ProposalStatus::Approved
                | ProposalStatus::Rejected
                | ProposalStatus::ChangesRequested
        )
    }

    /// Whether the author may still edit the narrative fields.
    pub fn is_amendable(&self) -> bool {
        matches!(
            self.status,
            ProposalStatus::Draft | ProposalStatus::ChangesRequested
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal_with_status(status: ProposalStatus) -> Proposal {
        Proposal {
            id: 1,
            author_id: 1,
            title: "Intro to Rust".to_string(),
            summary: "A first course".to_string(),
            qualifications: String::new(),
            target_audience: String::new(),
            learning_objectives: String::new(),
            outline: String::new(),
            assumed_prerequisites: String::new(),
            reviewer_id: None,
            review_notes: String::new(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn amendable_only_while_draft_or_changes_requested() {
        assert!(proposal_with_status(ProposalStatus::Draft).is_amendable());
        assert!(proposal_with_status(ProposalStatus::ChangesRequested).is_amendable());
        assert!(!proposal_with_status(ProposalStatus::Submitted).is_amendable());
        assert!(!proposal_with_status(ProposalStatus::Approved).is_amendable());
        assert!(!proposal_with_status(ProposalStatus::Withdrawn).is_amendable());
    }

    #[test]
    fn was_submitted_excludes_draft_and_withdrawn() {
        assert!(!proposal_with_status(ProposalStatus::Draft).was_submitted());
        assert!(!proposal_with_status(ProposalStatus::Withdrawn).was_submitted());
        assert!(proposal_with_status(ProposalStatus::Submitted).was_submitted());
        assert!(proposal_with_status(ProposalStatus::Rejected).was_submitted());
    }
}
