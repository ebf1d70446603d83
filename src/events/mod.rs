//! Domain events and the in-process bus that distributes them

mod bus;
mod catalog;
mod worker;

pub use bus::{EventBus, EventHandler, PublishError, SyncEventBus};
pub use catalog::*;
pub use worker::AsyncEventBus;
