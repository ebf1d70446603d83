mod model;
mod repository;

pub use model::{ContentItem, ContentKind, ContentStatus, ReadingFormat};
pub use repository::ContentRepository;
