use async_trait::async_trait;

use super::Course;
use crate::domain::DomainResult;

/// Persistence contract for courses.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Assigns the id and both timestamps, returning the stored copy.
    async fn create(&self, course: Course) -> DomainResult<Course>;

    async fn get_by_id(&self, id: i64) -> DomainResult<Option<Course>>;

    /// The course created from a proposal, if any. There is never more
    /// than one.
    async fn get_by_proposal_id(&self, proposal_id: i64) -> DomainResult<Option<Course>>;

    /// Every live course, newest first.
    async fn list_all_live(&self) -> DomainResult<Vec<Course>>;

    /// Overwrites by id and bumps `updated_at`. Silently no-ops when the id
    /// is unknown.
    async fn update(&self, course: Course) -> DomainResult<()>;
}
