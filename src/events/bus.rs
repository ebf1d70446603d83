//! In-process event bus
//!
//! Routes published events to the handlers registered for their name.
//! Handler registration happens once at startup; there is no unsubscribe.
//! A failing handler is logged and skipped so the remaining handlers — and
//! the publishing transaction, which already committed — are unaffected.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error};

use super::DomainEvent;

/// A side-effecting subscriber for one or more event names.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()>;
}

#[derive(Debug, Error)]
pub enum PublishError {
    /// The queued bus refused the event because shutdown already fired.
    #[error("event bus is shutting down")]
    ShuttingDown,
}

/// Publish/subscribe contract shared by both bus flavors.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Register a handler for an event name. Handlers for the same name run
    /// in registration order.
    fn subscribe(&self, event_name: &'static str, handler: Arc<dyn EventHandler>);

    /// Deliver the event to every handler registered for its name.
    /// Publishing with no registered handlers is a no-op.
    async fn publish(&self, event: DomainEvent) -> Result<(), PublishError>;
}

/// Handler table plus the inline dispatch loop both bus flavors share.
///
/// Writes happen only during startup registration; publishes take the read
/// side concurrently.
#[derive(Default)]
pub(crate) struct HandlerRegistry {
    handlers: RwLock<HashMap<&'static str, Vec<Arc<dyn EventHandler>>>>,
}

impl HandlerRegistry {
    pub(crate) fn subscribe(&self, event_name: &'static str, handler: Arc<dyn EventHandler>) {
        let mut table = self
            .handlers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let entry = table.entry(event_name).or_default();
        entry.push(handler);
        debug!(
            event = event_name,
            handlers = entry.len(),
            "event handler registered"
        );
    }

    /// Run every handler for the event, sequentially, in registration order.
    pub(crate) async fn dispatch(&self, event: &DomainEvent) {
        let handlers = {
            let table = self
                .handlers
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            match table.get(event.event_name()) {
                Some(list) => list.clone(),
                None => {
                    debug!(event = event.event_name(), "no handlers for event");
                    return;
                }
            }
        };

        debug!(
            event = event.event_name(),
            handlers = handlers.len(),
            "dispatching event"
        );

        for (index, handler) in handlers.iter().enumerate() {
            if let Err(err) = handler.handle(event).await {
                error!(
                    event = event.event_name(),
                    handler_index = index,
                    payload = %serde_json::to_string(event).unwrap_or_default(),
                    error = %err,
                    "event handler failed"
                );
                // Remaining handlers still run.
            }
        }
    }
}

/// Bus that dispatches inline on the publishing task.
///
/// `publish` resolves only after every handler for the event has returned.
#[derive(Default)]
pub struct SyncEventBus {
    registry: HandlerRegistry,
}

impl SyncEventBus {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventBus for SyncEventBus {
    fn subscribe(&self, event_name: &'static str, handler: Arc<dyn EventHandler>) {
        self.registry.subscribe(event_name, handler);
    }

    async fn publish(&self, event: DomainEvent) -> Result<(), PublishError> {
        self.registry.dispatch(&event).await;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records the names of handled events, tagged with a label so ordering
    /// across handlers is observable.
    pub(crate) struct Recorder {
        pub label: &'static str,
        pub seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
            self.seen
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.label, event.event_name()));
            Ok(())
        }
    }

    pub(crate) struct Failing;

    #[async_trait]
    impl EventHandler for Failing {
        async fn handle(&self, _event: &DomainEvent) -> anyhow::Result<()> {
            anyhow::bail!("subscriber exploded")
        }
    }

    pub(crate) fn sample_event(proposal_id: i64) -> DomainEvent {
        DomainEvent::ProposalCreated(crate::events::ProposalCreatedEvent {
            proposal_id,
            author_id: 42,
            title: "Intro to Go".to_string(),
            occurred_at: chrono::Utc::now(),
        })
    }
}
