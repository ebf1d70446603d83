use async_trait::async_trait;

use super::Module;
use crate::domain::DomainResult;

/// Persistence contract for course modules.
#[async_trait]
pub trait ModuleRepository: Send + Sync {
    /// Assigns the id and both timestamps, returning the stored copy.
    async fn create(&self, module: Module) -> DomainResult<Module>;

    async fn get_by_id(&self, id: i64) -> DomainResult<Option<Module>>;

    /// Modules of one course, ordered by position.
    async fn list_by_course(&self, course_id: i64) -> DomainResult<Vec<Module>>;

    /// Overwrites by id and bumps `updated_at`. Silently no-ops when the id
    /// is unknown.
    async fn update(&self, module: Module) -> DomainResult<()>;

    /// Removing an unknown id is a no-op.
    async fn delete_by_id(&self, id: i64) -> DomainResult<()>;
}
