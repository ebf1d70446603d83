use async_trait::async_trait;

use super::Proposal;
use crate::domain::DomainResult;

/// Persistence contract for proposals.
#[async_trait]
pub trait ProposalRepository: Send + Sync {
    /// Assigns the id and both timestamps, returning the stored copy.
    async fn create(&self, proposal: Proposal) -> DomainResult<Proposal>;

    async fn get_by_id(&self, id: i64) -> DomainResult<Option<Proposal>>;

    /// All proposals by one author, newest first.
    async fn list_by_author(&self, author_id: i64) -> DomainResult<Vec<Proposal>>;

    /// Every proposal that has entered review (submitted, approved, rejected
    /// or changes_requested), newest first.
    async fn list_all_submitted(&self) -> DomainResult<Vec<Proposal>>;

    /// Overwrites by id and bumps `updated_at`. Silently no-ops when the id
    /// is unknown.
    async fn update(&self, proposal: Proposal) -> DomainResult<()>;

    /// Removing an unknown id is a no-op.
    async fn delete_by_id(&self, id: i64) -> DomainResult<()>;
}
