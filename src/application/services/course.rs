//! Course workflow service
//!
//! Creates courses (standalone, or from an approved proposal) and governs
//! the one-way draft→live publication. Narrative updates stay open after
//! publication; only the proposal side locks its text during review.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::domain::access;
use crate::domain::{
    Course, CourseRepository, CourseStatus, DomainError, DomainResult, ProposalRepository,
    ProposalStatus, User,
};
use crate::events::{
    CourseCreatedFromProposalEvent, CoursePublishedEvent, CourseUpdatedEvent, DomainEvent,
    EventBus,
};

/// Full desired state of a course's narrative fields.
#[derive(Debug, Clone, Validate)]
pub struct CourseDraft {
    #[validate(length(min = 4, max = 128, message = "must be between 4 and 128 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 2048, message = "required, at most 2048 characters"))]
    pub summary: String,
    #[validate(length(max = 2048, message = "must be at most 2048 characters"))]
    pub target_audience: String,
    #[validate(length(max = 2048, message = "must be at most 2048 characters"))]
    pub learning_objectives: String,
    #[validate(length(max = 2048, message = "must be at most 2048 characters"))]
    pub assumed_prerequisites: String,
}

impl CourseDraft {
    fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.summary = self.summary.trim().to_string();
        self.target_audience = self.target_audience.trim().to_string();
        self.learning_objectives = self.learning_objectives.trim().to_string();
        self.assumed_prerequisites = self.assumed_prerequisites.trim().to_string();
        self
    }
}

pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    proposals: Arc<dyn ProposalRepository>,
    events: Arc<dyn EventBus>,
}

impl CourseService {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        proposals: Arc<dyn ProposalRepository>,
        events: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            courses,
            proposals,
            events,
        }
    }

    /// Standalone draft course, not backed by a proposal.
    pub async fn create(&self, instructor_id: i64, draft: CourseDraft) -> DomainResult<Course> {
        let draft = draft.normalized();
        draft.validate()?;

        let course = Course {
            id: 0,
            title: draft.title,
            summary: draft.summary,
            target_audience: draft.target_audience,
            learning_objectives: draft.learning_objectives,
            assumed_prerequisites: draft.assumed_prerequisites,
            instructor_id,
            proposal_id: None,
            status: CourseStatus::Draft,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let course = self.courses.create(course).await?;

        info!(course_id = course.id, instructor_id, "course created");
        Ok(course)
    }

    /// Turns an approved proposal into a draft course owned by its author.
    /// At most one course may ever reference a proposal.
    pub async fn create_from_proposal(
        &self,
        actor_id: i64,
        proposal_id: i64,
    ) -> DomainResult<Course> {
        let proposal = self
            .proposals
            .get_by_id(proposal_id)
            .await?
            .ok_or(DomainError::NotFound("proposal"))?;

        if !access::can_create_course_from_proposal(actor_id, &proposal) {
            return Err(DomainError::NotFound("proposal"));
        }

        if proposal.status != ProposalStatus::Approved {
            return Err(DomainError::InvalidStatusTransition {
                action: "create a course from",
                status: proposal.status.to_string(),
            });
        }

        // Pre-check only; the storage layer's uniqueness is the authority.
        if self
            .courses
            .get_by_proposal_id(proposal.id)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "a course already exists for proposal {}",
                proposal.id
            )));
        }

        let course = self.courses.create(Course::from_proposal(&proposal)).await?;

        info!(
            course_id = course.id,
            proposal_id = proposal.id,
            instructor_id = course.instructor_id,
            "course created from proposal"
        );
        let _ = self
            .events
            .publish(DomainEvent::CourseCreatedFromProposal(
                CourseCreatedFromProposalEvent {
                    course_id: course.id,
                    proposal_id: proposal.id,
                    instructor_id: course.instructor_id,
                    title: course.title.clone(),
                    occurred_at: Utc::now(),
                },
            ))
            .await;

        Ok(course)
    }

    /// Draft → live. There is no unpublish.
    pub async fn publish(&self, actor_id: i64, course_id: i64) -> DomainResult<Course> {
        let mut course = self
            .courses
            .get_by_id(course_id)
            .await?
            .ok_or(DomainError::NotFound("course"))?;

        if !access::can_publish_course(actor_id, &course) {
            return Err(DomainError::NotFound("course"));
        }

        if course.status != CourseStatus::Draft {
            return Err(DomainError::InvalidStatusTransition {
                action: "publish",
                status: course.status.to_string(),
            });
        }

        course.status = CourseStatus::Live;
        self.courses.update(course.clone()).await?;

        info!(course_id, instructor_id = course.instructor_id, "course published");
        let _ = self
            .events
            .publish(DomainEvent::CoursePublished(CoursePublishedEvent {
                course_id: course.id,
                instructor_id: course.instructor_id,
                title: course.title.clone(),
                occurred_at: Utc::now(),
            }))
            .await;

        Ok(course)
    }

    /// Overwrites the narrative fields. Allowed in draft and in live.
    pub async fn update(
        &self,
        actor_id: i64,
        course_id: i64,
        draft: CourseDraft,
    ) -> DomainResult<Course> {
        let mut course = self
            .courses
            .get_by_id(course_id)
            .await?
            .ok_or(DomainError::NotFound("course"))?;

        if !access::can_edit_course(actor_id, &course) {
            return Err(DomainError::NotFound("course"));
        }

        let draft = draft.normalized();
        draft.validate()?;

        course.title = draft.title;
        course.summary = draft.summary;
        course.target_audience = draft.target_audience;
        course.learning_objectives = draft.learning_objectives;
        course.assumed_prerequisites = draft.assumed_prerequisites;

        self.courses.update(course.clone()).await?;

        let _ = self
            .events
            .publish(DomainEvent::CourseUpdated(CourseUpdatedEvent {
                course_id: course.id,
                instructor_id: course.instructor_id,
                title: course.title.clone(),
                occurred_at: Utc::now(),
            }))
            .await;

        Ok(course)
    }

    pub async fn get_by_id(&self, viewer: Option<&User>, course_id: i64) -> DomainResult<Course> {
        let course = self
            .courses
            .get_by_id(course_id)
            .await?
            .ok_or(DomainError::NotFound("course"))?;

        if !access::can_view_course(viewer, &course) {
            return Err(DomainError::NotFound("course"));
        }

        Ok(course)
    }

    pub async fn list_live(&self) -> DomainResult<Vec<Course>> {
        self.courses.list_all_live().await
    }
}

#[cfg(test)]
mod tests {
    use super::super::proposal::{ProposalService, ReviewDecision, ReviewProposal};
    use super::super::testing::{draft, recording_bus, seed_user};
    use super::*;
    use crate::domain::UserRole;
    use crate::infrastructure::memory::{
        InMemoryCourseStore, InMemoryProposalStore, InMemoryUserStore,
    };

    struct Fixture {
        proposals_svc: ProposalService,
        courses_svc: CourseService,
        users: Arc<InMemoryUserStore>,
        seen: super::super::testing::RecordedEvents,
    }

    fn fixture() -> Fixture {
        let proposals = Arc::new(InMemoryProposalStore::new());
        let courses = Arc::new(InMemoryCourseStore::new());
        let users = Arc::new(InMemoryUserStore::new());
        let (bus, seen) = recording_bus();
        Fixture {
            proposals_svc: ProposalService::new(proposals.clone(), users.clone(), bus.clone()),
            courses_svc: CourseService::new(courses, proposals, bus),
            users,
            seen,
        }
    }

    fn course_draft(title: &str) -> CourseDraft {
        CourseDraft {
            title: title.to_string(),
            summary: "What the course covers.".to_string(),
            target_audience: "Everyone".to_string(),
            learning_objectives: "Learn things".to_string(),
            assumed_prerequisites: "None".to_string(),
        }
    }

    #[tokio::test]
    async fn approved_proposal_becomes_a_draft_course_exactly_once() {
        let f = fixture();
        let author = seed_user(&f.users, UserRole::Instructor).await;
        let admin = seed_user(&f.users, UserRole::Admin).await;

        // Full path: draft → submitted → approved → course.
        let proposal = f
            .proposals_svc
            .create(author.id, draft("Intro to Go"))
            .await
            .unwrap();
        assert_eq!(proposal.status, ProposalStatus::Draft);

        let submitted = f.proposals_svc.submit(author.id, proposal.id).await.unwrap();
        assert_eq!(submitted.status, ProposalStatus::Submitted);

        let approved = f
            .proposals_svc
            .review(ReviewProposal {
                proposal_id: proposal.id,
                reviewer_id: admin.id,
                decision: ReviewDecision::Approve,
                notes: "ready".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(approved.status, ProposalStatus::Approved);
        assert_eq!(approved.reviewer_id, Some(admin.id));

        let course = f
            .courses_svc
            .create_from_proposal(author.id, proposal.id)
            .await
            .unwrap();
        assert_eq!(course.status, CourseStatus::Draft);
        assert_eq!(course.instructor_id, author.id);
        assert_eq!(course.proposal_id, Some(proposal.id));
        assert_eq!(course.title, "Intro to Go");

        {
            let events = f.seen.lock().unwrap();
            assert_eq!(
                *events,
                vec![
                    "proposal.created",
                    "proposal.submitted",
                    "proposal.approved",
                    "course.created_from_proposal",
                ]
            );
        }

        // A second conversion of the same proposal conflicts.
        let err = f
            .courses_svc
            .create_from_proposal(author.id, proposal.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn only_approved_proposals_convert() {
        let f = fixture();
        let author = seed_user(&f.users, UserRole::Instructor).await;

        let proposal = f
            .proposals_svc
            .create(author.id, draft("Intro to Go"))
            .await
            .unwrap();

        let err = f
            .courses_svc
            .create_from_proposal(author.id, proposal.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidStatusTransition { .. }));

        // Someone else's approved proposal stays invisible.
        let stranger = seed_user(&f.users, UserRole::Instructor).await;
        let err = f
            .courses_svc
            .create_from_proposal(stranger.id, proposal.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn publication_is_one_way() {
        let f = fixture();
        let instructor = seed_user(&f.users, UserRole::Instructor).await;

        let course = f
            .courses_svc
            .create(instructor.id, course_draft("Databases"))
            .await
            .unwrap();

        let live = f
            .courses_svc
            .publish(instructor.id, course.id)
            .await
            .unwrap();
        assert_eq!(live.status, CourseStatus::Live);
        assert!(f
            .seen
            .lock()
            .unwrap()
            .contains(&"course.published".to_string()));

        let err = f
            .courses_svc
            .publish(instructor.id, course.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidStatusTransition { .. }));
    }

    #[tokio::test]
    async fn live_courses_stay_editable() {
        let f = fixture();
        let instructor = seed_user(&f.users, UserRole::Instructor).await;

        let course = f
            .courses_svc
            .create(instructor.id, course_draft("Databases"))
            .await
            .unwrap();
        f.courses_svc
            .publish(instructor.id, course.id)
            .await
            .unwrap();

        let updated = f
            .courses_svc
            .update(instructor.id, course.id, course_draft("Databases, 2nd edition"))
            .await
            .unwrap();
        assert_eq!(updated.title, "Databases, 2nd edition");
        assert!(f
            .seen
            .lock()
            .unwrap()
            .contains(&"course.updated".to_string()));
    }

    #[tokio::test]
    async fn strangers_cannot_publish_or_edit() {
        let f = fixture();
        let instructor = seed_user(&f.users, UserRole::Instructor).await;
        let stranger = seed_user(&f.users, UserRole::Student).await;

        let course = f
            .courses_svc
            .create(instructor.id, course_draft("Databases"))
            .await
            .unwrap();

        let err = f
            .courses_svc
            .publish(stranger.id, course.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = f
            .courses_svc
            .update(stranger.id, course.id, course_draft("Hijack"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn draft_courses_hide_from_outsiders() {
        let f = fixture();
        let instructor = seed_user(&f.users, UserRole::Instructor).await;
        let student = seed_user(&f.users, UserRole::Student).await;

        let course = f
            .courses_svc
            .create(instructor.id, course_draft("Databases"))
            .await
            .unwrap();

        let err = f
            .courses_svc
            .get_by_id(Some(&student), course.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        f.courses_svc
            .publish(instructor.id, course.id)
            .await
            .unwrap();
        assert!(f.courses_svc.get_by_id(None, course.id).await.is_ok());
        assert_eq!(f.courses_svc.list_live().await.unwrap().len(), 1);
    }
}
