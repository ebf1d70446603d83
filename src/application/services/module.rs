//! Module workflow service
//!
//! Modules are ordered sections of a course, managed by the course's
//! instructor. Position is unique within the parent course.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::domain::access;
use crate::domain::{
    Course, CourseRepository, DomainError, DomainResult, Module, ModuleRepository, ModuleStatus,
    User,
};
use crate::events::{
    DomainEvent, EventBus, ModuleCreatedEvent, ModuleDeletedEvent, ModulePublishedEvent,
    ModuleUpdatedEvent,
};

#[derive(Debug, Clone, Validate)]
pub struct ModuleDraft {
    #[validate(length(min = 1, max = 255, message = "required, at most 255 characters"))]
    pub title: String,
    #[validate(length(max = 2048, message = "must be at most 2048 characters"))]
    pub description: String,
    pub position: u32,
}

impl ModuleDraft {
    fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self
    }
}

pub struct ModuleService {
    modules: Arc<dyn ModuleRepository>,
    courses: Arc<dyn CourseRepository>,
    events: Arc<dyn EventBus>,
}

impl ModuleService {
    pub fn new(
        modules: Arc<dyn ModuleRepository>,
        courses: Arc<dyn CourseRepository>,
        events: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            modules,
            courses,
            events,
        }
    }

    pub async fn create(
        &self,
        actor_id: i64,
        course_id: i64,
        draft: ModuleDraft,
    ) -> DomainResult<Module> {
        let course = self.fetch_managed_course(actor_id, course_id).await?;

        let draft = draft.normalized();
        draft.validate()?;
        self.ensure_position_free(course_id, draft.position, None)
            .await?;

        let module = Module {
            id: 0,
            course_id,
            title: draft.title,
            description: draft.description,
            position: draft.position,
            status: ModuleStatus::Draft,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let module = self.modules.create(module).await?;

        info!(module_id = module.id, course_id, "module created");
        let _ = self
            .events
            .publish(DomainEvent::ModuleCreated(ModuleCreatedEvent {
                module_id: module.id,
                course_id,
                instructor_id: course.instructor_id,
                title: module.title.clone(),
                position: module.position,
                occurred_at: Utc::now(),
            }))
            .await;

        Ok(module)
    }

    pub async fn update(
        &self,
        actor_id: i64,
        module_id: i64,
        draft: ModuleDraft,
    ) -> DomainResult<Module> {
        let (mut module, course) = self.fetch_managed_module(actor_id, module_id).await?;

        let draft = draft.normalized();
        draft.validate()?;
        self.ensure_position_free(module.course_id, draft.position, Some(module.id))
            .await?;

        module.title = draft.title;
        module.description = draft.description;
        module.position = draft.position;
        self.modules.update(module.clone()).await?;

        let _ = self
            .events
            .publish(DomainEvent::ModuleUpdated(ModuleUpdatedEvent {
                module_id: module.id,
                course_id: module.course_id,
                instructor_id: course.instructor_id,
                title: module.title.clone(),
                occurred_at: Utc::now(),
            }))
            .await;

        Ok(module)
    }

    pub async fn publish(&self, actor_id: i64, module_id: i64) -> DomainResult<Module> {
        let (mut module, course) = self.fetch_managed_module(actor_id, module_id).await?;

        if module.status != ModuleStatus::Draft {
            return Err(DomainError::InvalidStatusTransition {
                action: "publish",
                status: module.status.to_string(),
            });
        }

        module.status = ModuleStatus::Published;
        self.modules.update(module.clone()).await?;

        info!(module_id, course_id = module.course_id, "module published");
        let _ = self
            .events
            .publish(DomainEvent::ModulePublished(ModulePublishedEvent {
                module_id: module.id,
                course_id: module.course_id,
                instructor_id: course.instructor_id,
                occurred_at: Utc::now(),
            }))
            .await;

        Ok(module)
    }

    pub async fn delete(&self, actor_id: i64, module_id: i64) -> DomainResult<()> {
        let (module, course) = self.fetch_managed_module(actor_id, module_id).await?;

        self.modules.delete_by_id(module.id).await?;

        info!(module_id, course_id = module.course_id, "module deleted");
        let _ = self
            .events
            .publish(DomainEvent::ModuleDeleted(ModuleDeletedEvent {
                module_id: module.id,
                course_id: module.course_id,
                instructor_id: course.instructor_id,
                occurred_at: Utc::now(),
            }))
            .await;

        Ok(())
    }

    /// Modules of a course, in position order. Instructor or admin only.
    pub async fn list_by_course(&self, actor: &User, course_id: i64) -> DomainResult<Vec<Module>> {
        let course = self
            .courses
            .get_by_id(course_id)
            .await?
            .ok_or(DomainError::NotFound("course"))?;

        if !actor.is_admin() && !access::can_manage_course_content(actor.id, &course) {
            return Err(DomainError::NotFound("course"));
        }

        self.modules.list_by_course(course_id).await
    }

    async fn fetch_managed_course(&self, actor_id: i64, course_id: i64) -> DomainResult<Course> {
        let course = self
            .courses
            .get_by_id(course_id)
            .await?
            .ok_or(DomainError::NotFound("course"))?;

        if !access::can_manage_course_content(actor_id, &course) {
            return Err(DomainError::NotFound("course"));
        }

        Ok(course)
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

        let course = self.fetch_managed_course(actor_id, module.course_id).await?;
        Ok((module, course))
    }

    async fn ensure_position_free(
        &self,
        course_id: i64,
        position: u32,
        except: Option<i64>,
    ) -> DomainResult<()> {
        let siblings = self.modules.list_by_course(course_id).await?;
        let taken = siblings
            .iter()
            .any(|m| m.position == position && Some(m.id) != except);
        if taken {
            return Err(DomainError::Conflict(format!(
                "position {position} is already taken in this course"
            )));
        }
        Ok(())
    }
}
