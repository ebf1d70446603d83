//! User domain entity

use chrono::{DateTime, Utc};

/// Authorization level of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Student,
    Instructor,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Instructor => write!(f, "instructor"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// An authenticated actor in the marketplace
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    /// Lowercased, unique across the system
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
