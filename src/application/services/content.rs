//! Content workflow service
//!
//! Content items are the ordered material inside a module (readings and
//! files). Authorization follows the chain content → module → course and is
//! decided by the course's instructor, like modules.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::domain::access;
use crate::domain::{
    ContentItem, ContentKind, ContentRepository, ContentStatus, Course, CourseRepository,
    DomainError, DomainResult, Module, ModuleRepository, User,
};
use crate::events::{
    ContentCreatedEvent, ContentDeletedEvent, ContentPublishedEvent, ContentUpdatedEvent,
    DomainEvent, EventBus,
};

#[derive(Debug, Clone, Validate)]
pub struct ContentDraft {
    #[validate(length(min = 1, max = 255, message = "required, at most 255 characters"))]
    pub title: String,
    pub position: u32,
    pub kind: ContentKind,
}

impl ContentDraft {
    fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self
    }
}

pub struct ContentService {
    content: Arc<dyn ContentRepository>,
    modules: Arc<dyn ModuleRepository>,
    courses: Arc<dyn CourseRepository>,
    events: Arc<dyn EventBus>,
}

impl ContentService {
    pub fn new(
        content: Arc<dyn ContentRepository>,
        modules: Arc<dyn ModuleRepository>,
        courses: Arc<dyn CourseRepository>,
        events: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            content,
            modules,
            courses,
            events,
        }
    }

    pub async fn create(
        &self,
        actor_id: i64,
        module_id: i64,
        draft: ContentDraft,
    ) -> DomainResult<ContentItem> {
        let (module, course) = self.fetch_managed_module(actor_id, module_id).await?;

        let draft = draft.normalized();
        draft.validate()?;
        self.ensure_position_free(module.id, draft.position, None)
            .await?;

        let item = ContentItem {
            id: 0,
            module_id: module.id,
            title: draft.title,
            position: draft.position,
            status: ContentStatus::Draft,
            kind: draft.kind,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let item = self.content.create(item).await?;

        info!(
            content_id = item.id,
            module_id,
            kind = item.kind.kind_name(),
            "content created"
        );
        let _ = self
            .events
            .publish(DomainEvent::ContentCreated(ContentCreatedEvent {
                content_id: item.id,
                module_id: module.id,
                course_id: course.id,
                instructor_id: course.instructor_id,
                title: item.title.clone(),
                occurred_at: Utc::now(),
            }))
            .await;

        Ok(item)
    }

    pub async fn update(
        &self,
        actor_id: i64,
        content_id: i64,
        draft: ContentDraft,
    ) -> DomainResult<ContentItem> {
        let (mut item, module, course) = self.fetch_managed_item(actor_id, content_id).await?;

        let draft = draft.normalized();
        draft.validate()?;
        self.ensure_position_free(module.id, draft.position, Some(item.id))
            .await?;

        item.title = draft.title;
        item.position = draft.position;
        item.kind = draft.kind;
        self.content.update(item.clone()).await?;

        let _ = self
            .events
            .publish(DomainEvent::ContentUpdated(ContentUpdatedEvent {
                content_id: item.id,
                module_id: module.id,
                course_id: course.id,
                instructor_id: course.instructor_id,
                title: item.title.clone(),
                occurred_at: Utc::now(),
            }))
            .await;

        Ok(item)
    }

    pub async fn publish(&self, actor_id: i64, content_id: i64) -> DomainResult<ContentItem> {
        let (mut item, module, course) = self.fetch_managed_item(actor_id, content_id).await?;

        if item.status != ContentStatus::Draft {
            return Err(DomainError::InvalidStatusTransition {
                action: "publish",
                status: item.status.to_string(),
            });
        }

        item.status = ContentStatus::Published;
        self.content.update(item.clone()).await?;

        info!(content_id, module_id = module.id, "content published");
        let _ = self
            .events
            .publish(DomainEvent::ContentPublished(ContentPublishedEvent {
                content_id: item.id,
                module_id: module.id,
                course_id: course.id,
                instructor_id: course.instructor_id,
                title: item.title.clone(),
                occurred_at: Utc::now(),
            }))
            .await;

        Ok(item)
    }

    pub async fn delete(&self, actor_id: i64, content_id: i64) -> DomainResult<()> {
        let (item, module, course) = self.fetch_managed_item(actor_id, content_id).await?;

        self.content.delete_by_id(item.id).await?;

        info!(content_id, module_id = module.id, "content deleted");
        let _ = self
            .events
            .publish(DomainEvent::ContentDeleted(ContentDeletedEvent {
                content_id: item.id,
                module_id: module.id,
                course_id: course.id,
                instructor_id: course.instructor_id,
                occurred_at: Utc::now(),
            }))
            .await;

        Ok(())
    }

    /// Content of a module, in position order. Instructor or admin only.
    pub async fn list_by_module(
        &self,
        actor: &User,
        module_id: i64,
    ) -> DomainResult<Vec<ContentItem>> {
        let module = self
            .modules
            .get_by_id(module_id)
            .await?
            .ok_or(DomainError::NotFound("module"))?;
        let course = self
            .courses
            .get_by_id(module.course_id)
            .await?
            .ok_or(DomainError::NotFound("course"))?;

        if !actor.is_admin() && !access::can_manage_course_content(actor.id, &course) {
            return Err(DomainError::NotFound("module"));
        }

        self.content.list_by_module(module_id).await
    }

    async fn fetch_managed_module(
        &self,
        actor_id: i64,
        module_id: i64,
    ) -> DomainResult<(Module, Course)> {
        let module = self
            .modules
            .get_by_id(module_id)
            .await?
            .ok_or(DomainError::NotFound("module"))?;
        let course = self
            .courses
            .get_by_id(module.course_id)
            .await?
            .ok_or(DomainError::NotFound("course"))?;

        if !access::can_manage_course_content(actor_id, &course) {
            return Err(DomainError::NotFound("module"));
        }

        Ok((module, course))
    }

    async fn fetch_managed_item(
        &self,
        actor_id: i64,
        content_id: i64,
    ) -> DomainResult<(ContentItem, Module, Course)> {
        let item = self
            .content
            .get_by_id(content_id)
            .await?
            .ok_or(DomainError::NotFound("content"))?;

        let (module, course) = self.fetch_managed_module(actor_id, item.module_id).await?;
        Ok((item, module, course))
    }

    async fn ensure_position_free(
        &self,
        module_id: i64,
        position: u32,
        except: Option<i64>,
    ) -> DomainResult<()> {
        let siblings = self.content.list_by_module(module_id).await?;
        let taken = siblings
            .iter()
            .any(|c| c.position == position && Some(c.id) != except);
        if taken {
            return Err(DomainError::Conflict(format!(
                "position {position} is already taken in this module"
            )));
        }
        Ok(())
    }
}
