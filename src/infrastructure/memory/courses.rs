//! In-memory course store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{Course, CourseRepository, DomainResult};

#[derive(Default)]
struct Inner {
    by_id: HashMap<i64, Course>,
    next_id: i64,
}

pub struct InMemoryCourseStore {
    inner: RwLock<Inner>,
}

impl InMemoryCourseStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }
}

impl Default for InMemoryCourseStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseStore {
    async fn create(&self, mut course: Course) -> DomainResult<Course> {
        let mut inner = self.inner.write().await;

        course.id = inner.next_id;
        course.created_at = Utc::now();
        course.updated_at = course.created_at;
        inner.next_id += 1;

        inner.by_id.insert(course.id, course.clone());
        Ok(course)
    }

    async fn get_by_id(&self, id: i64) -> DomainResult<Option<Course>> {
        let inner = self.inner.read().await;
        Ok(inner.by_id.get(&id).cloned())
    }

    async fn get_by_proposal_id(&self, proposal_id: i64) -> DomainResult<Option<Course>> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_id
            .values()
            .find(|c| c.proposal_id == Some(proposal_id))
            .cloned())
    }

    async fn list_all_live(&self) -> DomainResult<Vec<Course>> {
        let inner = self.inner.read().await;
        let mut out: Vec<Course> = inner
            .by_id
            .values()
            .filter(|c| c.is_live())
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(out)
    }

    async fn update(&self, mut course: Course) -> DomainResult<()> {
        let mut inner = self.inner.write().await;

        // Unknown ids are silently ignored.
        if inner.by_id.contains_key(&course.id) {
            course.updated_at = Utc::now();
            inner.by_id.insert(course.id, course);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CourseStatus;

    fn course(instructor_id: i64, proposal_id: Option<i64>, status: CourseStatus) -> Course {
        Course {
            id: 0,
            title: "Some course".to_string(),
            summary: "summary".to_string(),
            target_audience: String::new(),
            learning_objectives: String::new(),
            assumed_prerequisites: String::new(),
            instructor_id,
            proposal_id,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn finds_the_course_backed_by_a_proposal() {
        let store = InMemoryCourseStore::new();
        store
            .create(course(1, None, CourseStatus::Draft))
            .await
            .unwrap();
        let backed = store
            .create(course(1, Some(77), CourseStatus::Draft))
            .await
            .unwrap();

        let found = store.get_by_proposal_id(77).await.unwrap().unwrap();
        assert_eq!(found.id, backed.id);
        assert!(store.get_by_proposal_id(78).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn live_listing_filters_drafts() {
        let store = InMemoryCourseStore::new();
        store
            .create(course(1, None, CourseStatus::Draft))
            .await
            .unwrap();
        store
            .create(course(1, None, CourseStatus::Live))
            .await
            .unwrap();

        let live = store.list_all_live().await.unwrap();
        assert_eq!(live.len(), 1);
        assert!(live[0].is_live());
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_a_silent_no_op() {
        let store = InMemoryCourseStore::new();
        let mut ghost = course(1, None, CourseStatus::Draft);
        ghost.id = 9;

        store.update(ghost).await.unwrap();
        assert!(store.get_by_id(9).await.unwrap().is_none());
    }
}
