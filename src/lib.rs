//! # Courseflow
//!
//! Course-marketplace backend: instructors pitch proposals, admins review
//! them, approved proposals become courses, courses go live. The heart of
//! the crate is the event-driven workflow engine — guarded state machines
//! that publish domain events onto an in-process bus (inline or through a
//! bounded worker pool).
//!
//! ## Architecture
//!
//! - **domain**: entities, status machines, access predicates and the
//!   repository contracts
//! - **events**: the event catalog plus the sync and queued bus flavors
//! - **application**: workflow services enforcing guards, validation and
//!   event emission
//! - **infrastructure**: in-memory repositories and credential handling
//! - **notifications**: email subscribers registered on the bus at startup

pub mod application;
pub mod config;
pub mod domain;
pub mod events;
pub mod infrastructure;
pub mod notifications;
pub mod shared;

pub use application::services;
pub use config::{default_config_path, AppConfig};
pub use events::{AsyncEventBus, DomainEvent, EventBus, EventHandler, SyncEventBus};
