//! In-memory proposal store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{DomainResult, Proposal, ProposalRepository};

#[derive(Default)]
struct Inner {
    by_id: HashMap<i64, Proposal>,
    next_id: i64,
}

pub struct InMemoryProposalStore {
    inner: RwLock<Inner>,
}

impl InMemoryProposalStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }
}

impl Default for InMemoryProposalStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Newest first, with the id as tie-breaker for equal timestamps.
fn newest_first(proposals: &mut [Proposal]) {
    proposals.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[async_trait]
impl ProposalRepository for InMemoryProposalStore {
    async fn create(&self, mut proposal: Proposal) -> DomainResult<Proposal> {
        let mut inner = self.inner.write().await;

        proposal.id = inner.next_id;
        proposal.created_at = Utc::now();
        proposal.updated_at = proposal.created_at;
        inner.next_id += 1;

        inner.by_id.insert(proposal.id, proposal.clone());
        Ok(proposal)
    }

    async fn get_by_id(&self, id: i64) -> DomainResult<Option<Proposal>> {
        let inner = self.inner.read().await;
        Ok(inner.by_id.get(&id).cloned())
    }

    async fn list_by_author(&self, author_id: i64) -> DomainResult<Vec<Proposal>> {
        let inner = self.inner.read().await;
        let mut out: Vec<Proposal> = inner
            .by_id
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        newest_first(&mut out);
        Ok(out)
    }

    async fn list_all_submitted(&self) -> DomainResult<Vec<Proposal>> {
        let inner = self.inner.read().await;
        let mut out: Vec<Proposal> = inner
            .by_id
            .values()
            .filter(|p| p.was_submitted())
            .cloned()
            .collect();
        newest_first(&mut out);
        Ok(out)
    }

    async fn update(&self, mut proposal: Proposal) -> DomainResult<()> {
        let mut inner = self.inner.write().await;

        // Unknown ids are silently ignored.
        if inner.by_id.contains_key(&proposal.id) {
            proposal.updated_at = Utc::now();
            inner.by_id.insert(proposal.id, proposal);
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> DomainResult<()> {
        let mut inner = self.inner.write().await;
        inner.by_id.remove(&id);
        Ok(())
    }
}
