//! Outbound email contract

use async_trait::async_trait;
use tracing::info;

/// Delivery channel for notification emails. Content and transport live
/// behind this trait; the workflow engine only knows how to hand a message
/// over.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// Sender for development and tests: logs the message and drops it.
pub struct NullSender;

#[async_trait]
impl EmailSender for NullSender {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> anyhow::Result<()> {
        info!(to, subject, "email suppressed (null sender)");
        Ok(())
    }
}
