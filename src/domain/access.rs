//! Per-operation authorization predicates
//!
//! One explicit predicate per guarded operation, independent of transition
//! logic. Ownership violations surface as `NotFound` at the service layer so
//! another user's records never reveal their existence; role violations on
//! admin queries surface as `Forbidden`.

use super::course::Course;
use super::proposal::Proposal;
use super::user::User;

pub fn can_amend_proposal(actor_id: i64, proposal: &Proposal) -> bool {
    proposal.author_id == actor_id
}

pub fn can_submit_proposal(actor_id: i64, proposal: &Proposal) -> bool {
    proposal.author_id == actor_id
}

pub fn can_withdraw_proposal(actor_id: i64, proposal: &Proposal) -> bool {
    proposal.author_id == actor_id
}

pub fn can_delete_proposal(actor_id: i64, proposal: &Proposal) -> bool {
    proposal.author_id == actor_id
}

pub fn can_review_proposals(actor: &User) -> bool {
    actor.is_admin()
}

pub fn can_list_submitted(actor: &User) -> bool {
    actor.is_admin()
}

pub fn can_view_proposal(actor: &User, proposal: &Proposal) -> bool {
    proposal.author_id == actor.id || (actor.is_admin() && proposal.was_submitted())
}

pub fn can_create_course_from_proposal(actor_id: i64, proposal: &Proposal) -> bool {
    proposal.author_id == actor_id
}

pub fn can_edit_course(actor_id: i64, course: &Course) -> bool {
    course.is_taught_by(actor_id)
}

pub fn can_publish_course(actor_id: i64, course: &Course) -> bool {
    course.is_taught_by(actor_id)
}

pub fn can_manage_course_content(actor_id: i64, course: &Course) -> bool {
    course.is_taught_by(actor_id)
}

pub fn can_view_course(actor: Option<&User>, course: &Course) -> bool {
    if course.is_live() {
        return true;
    }
    match actor {
        Some(user) => user.is_admin() || course.is_taught_by(user.id),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::course::CourseStatus;
    use crate::domain::proposal::ProposalStatus;
    use crate::domain::user::UserRole;

    fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            email: format!("u{id}@example.com"),
            name: format!("User {id}"),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
        }
    }

    fn proposal(author_id: i64, status: ProposalStatus) -> Proposal {
        Proposal {
            id: 10,
            author_id,
            title: "Systems Programming".to_string(),
            summary: "summary".to_string(),
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

    fn course(instructor_id: i64, status: CourseStatus) -> Course {
        Course {
            id: 20,
            title: "Systems Programming".to_string(),
            summary: "summary".to_string(),
            target_audience: String::new(),
            learning_objectives: String::new(),
            assumed_prerequisites: String::new(),
            instructor_id,
            proposal_id: None,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn only_the_author_may_amend_or_submit() {
        let p = proposal(42, ProposalStatus::Draft);
        assert!(can_amend_proposal(42, &p));
        assert!(can_submit_proposal(42, &p));
        assert!(!can_amend_proposal(7, &p));
        assert!(!can_submit_proposal(7, &p));
    }

    #[test]
    fn review_is_admin_only() {
        assert!(can_review_proposals(&user(7, UserRole::Admin)));
        assert!(!can_review_proposals(&user(7, UserRole::Instructor)));
        assert!(!can_review_proposals(&user(7, UserRole::Student)));
    }

    #[test]
    fn admins_see_only_submitted_proposals_of_others() {
        let admin = user(7, UserRole::Admin);
        assert!(can_view_proposal(&admin, &proposal(42, ProposalStatus::Submitted)));
        assert!(!can_view_proposal(&admin, &proposal(42, ProposalStatus::Draft)));

        let author = user(42, UserRole::Student);
        assert!(can_view_proposal(&author, &proposal(42, ProposalStatus::Draft)));
    }

    #[test]
    fn draft_courses_are_private_to_instructor_and_admin() {
        let draft = course(42, CourseStatus::Draft);
        assert!(can_view_course(Some(&user(42, UserRole::Instructor)), &draft));
        assert!(can_view_course(Some(&user(7, UserRole::Admin)), &draft));
        assert!(!can_view_course(Some(&user(5, UserRole::Student)), &draft));
        assert!(!can_view_course(None, &draft));

        let live = course(42, CourseStatus::Live);
        assert!(can_view_course(None, &live));
    }
}
