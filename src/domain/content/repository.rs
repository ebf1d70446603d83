use async_trait::async_trait;

use super::ContentItem;
use crate::domain::DomainResult;

/// Persistence contract for module content.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Assigns the id and both timestamps, returning the stored copy.
    async fn create(&self, item: ContentItem) -> DomainResult<ContentItem>;

    async fn get_by_id(&self, id: i64) -> DomainResult<Option<ContentItem>>;

    /// Content of one module, ordered by position.
    async fn list_by_module(&self, module_id: i64) -> DomainResult<Vec<ContentItem>>;

    /// Overwrites by id and bumps `updated_at`. Silently no-ops when the id
    /// is unknown.
    async fn update(&self, item: ContentItem) -> DomainResult<()>;

    /// Removing an unknown id is a no-op.
    async fn delete_by_id(&self, id: i64) -> DomainResult<()>;
}
