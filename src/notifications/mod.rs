//! Email notifications reacting to domain events

mod email;
mod subscribers;

pub use email::{EmailSender, NullSender};
pub use subscribers::register_email_subscribers;
