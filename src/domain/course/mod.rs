mod model;
mod repository;

pub use model::{Course, CourseStatus};
pub use repository::CourseRepository;
