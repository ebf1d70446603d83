//! Course module domain entity

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    Draft,
    Published,
}

impl std::fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Published => write!(f, "published"),
        }
    }
}

/// An ordered section of a course
#[derive(Debug, Clone)]
pub struct Module {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: String,
    /// Unique within the parent course
    pub position: u32,
    pub status: ModuleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
