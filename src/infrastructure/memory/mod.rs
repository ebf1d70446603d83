//! Map-backed repository implementations
//!
//! Each store guards its state with one `RwLock` and hands out copies, so
//! concurrent workflow calls never share mutable entities. These back the
//! dev binary and the service tests; durable storage lives behind the same
//! repository traits.

mod content;
mod courses;
mod modules;
mod proposals;
mod users;

pub use content::InMemoryContentStore;
pub use courses::InMemoryCourseStore;
pub use modules::InMemoryModuleStore;
pub use proposals::InMemoryProposalStore;
pub use users::{InMemoryPasswordResetStore, InMemoryUserStore};
