//! Core business entities, contracts and authorization rules

pub mod access;
pub mod content;
pub mod course;
mod error;
pub mod module;
pub mod proposal;
pub mod user;

pub use content::{ContentItem, ContentKind, ContentRepository, ContentStatus, ReadingFormat};
pub use course::{Course, CourseRepository, CourseStatus};
pub use error::{DomainError, DomainResult, FieldFailure, ValidationFailures};
pub use module::{Module, ModuleRepository, ModuleStatus};
pub use proposal::{Proposal, ProposalRepository, ProposalStatus};
pub use user::{PasswordResetRepository, User, UserRepository, UserRole};
