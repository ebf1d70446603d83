mod model;
mod repository;

pub use model::{User, UserRole};
pub use repository::{PasswordResetRepository, UserRepository};
