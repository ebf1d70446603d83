mod model;
mod repository;

pub use model::{Module, ModuleStatus};
pub use repository::ModuleRepository;
