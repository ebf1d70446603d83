//! Course domain entity

use chrono::{DateTime, Utc};

use crate::domain::proposal::Proposal;

/// Course publication state. Publication is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseStatus {
    Draft,
    Live,
}

impl std::fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Live => write!(f, "live"),
        }
    }
}

/// A course offered on the marketplace
#[derive(Debug, Clone)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub target_audience: String,
    pub learning_objectives: String,
    pub assumed_prerequisites: String,
    pub instructor_id: i64,
    /// At most one course may reference a given proposal
    pub proposal_id: Option<i64>,
    pub status: CourseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Builds a draft course from an approved proposal, copying the
    /// narrative fields and making the author the instructor.
    pub fn from_proposal(proposal: &Proposal) -> Self {
        Self {
            id: 0,
            title: proposal.title.clone(),
            summary: proposal.summary.clone(),
            target_audience: proposal.target_audience.clone(),
            learning_objectives: proposal.learning_objectives.clone(),
            assumed_prerequisites: proposal.assumed_prerequisites.clone(),
            instructor_id: proposal.author_id,
            proposal_id: Some(proposal.id),
            status: CourseStatus::Draft,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.status == CourseStatus::Live
    }

    pub fn is_taught_by(&self, user_id: i64) -> bool {
        self.instructor_id == user_id
    }
}
