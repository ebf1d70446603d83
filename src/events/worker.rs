//! Queued event bus backed by a worker-task pool
//!
//! `publish` enqueues onto a bounded FIFO queue and returns; a fixed pool of
//! long-lived worker tasks drains the queue and runs the same inline dispatch
//! as the synchronous bus. A full queue blocks the publisher until a slot
//! frees or shutdown fires. With one worker the delivery order equals the
//! enqueue order; with several there is no cross-worker ordering, though each
//! event still sees its handlers run in registration order.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::bus::{EventBus, EventHandler, HandlerRegistry, PublishError};
use super::DomainEvent;
use crate::shared::shutdown::ShutdownSignal;

pub struct AsyncEventBus {
    registry: Arc<HandlerRegistry>,
    queue: mpsc::Sender<DomainEvent>,
    shutdown: ShutdownSignal,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl AsyncEventBus {
    /// Spawn `workers` drain tasks over a queue of `queue_capacity` slots.
    /// Both values come from configuration; zero workers is clamped to one.
    pub fn start(workers: usize, queue_capacity: usize) -> Self {
        let registry = Arc::new(HandlerRegistry::default());
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));
        let shutdown = ShutdownSignal::new();

        let handles = (0..workers.max(1))
            .map(|worker| {
                let registry = registry.clone();
                let rx = rx.clone();
                let shutdown = shutdown.clone();
                tokio::spawn(async move {
                    debug!(worker, "event worker started");
                    loop {
                        // The receiver lock is held only while waiting for a
                        // job, never across a dispatch, so one slow handler
                        // does not stall the whole pool.
                        let job = {
                            let mut queue = rx.lock().await;
                            tokio::select! {
                                _ = shutdown.notified().wait() => None,
                                job = queue.recv() => job,
                            }
                        };
                        match job {
                            Some(event) => registry.dispatch(&event).await,
                            None => break,
                        }
                    }
                    debug!(worker, "event worker stopped");
                })
            })
            .collect();

        info!(
            workers = workers.max(1),
            queue_capacity = queue_capacity.max(1),
            "event worker pool started"
        );

        Self {
            registry,
            queue: tx,
            shutdown,
            workers: Mutex::new(handles),
        }
    }

    /// Stop accepting events and wait for every worker to wind down.
    ///
    /// Jobs a worker already dequeued finish dispatching; jobs still sitting
    /// in the queue are not guaranteed to run.
    pub async fn shutdown(&self) {
        self.shutdown.trigger();
        let mut workers = self.workers.lock().await;
        for handle in workers.drain(..) {
            if let Err(err) = handle.await {
                warn!(error = %err, "event worker panicked during shutdown");
            }
        }
        info!("event worker pool drained");
    }
}

#[async_trait]
impl EventBus for AsyncEventBus {
    fn subscribe(&self, event_name: &'static str, handler: Arc<dyn EventHandler>) {
        self.registry.subscribe(event_name, handler);
    }

    async fn publish(&self, event: DomainEvent) -> Result<(), PublishError> {
        if self.shutdown.is_triggered() {
            return Err(PublishError::ShuttingDown);
        }
        tokio::select! {
            _ = self.shutdown.notified().wait() => Err(PublishError::ShuttingDown),
            sent = self.queue.send(event) => sent.map_err(|_| PublishError::ShuttingDown),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use super::super::bus::testing::sample_event;
    use super::*;

    struct Counting {
        count: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl EventHandler for Counting {
        async fn handle(&self, _event: &DomainEvent) -> anyhow::Result<()> {
            self.count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct IdRecorder {
        ids: Arc<StdMutex<Vec<i64>>>,
    }

    #[async_trait]
    impl EventHandler for IdRecorder {
        async fn handle(&self, event: &DomainEvent) -> anyhow::Result<()> {
            if let DomainEvent::ProposalCreated(e) = event {
                self.ids.lock().unwrap().push(e.proposal_id);
            }
            Ok(())
        }
    }

    async fn wait_until(mut ready: impl FnMut() -> bool) {
        for _ in 0..500 {
            if ready() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached within timeout");
    }

    #[tokio::test]
    async fn single_worker_preserves_enqueue_order() {
        let bus = AsyncEventBus::start(1, 16);
        let ids = Arc::new(StdMutex::new(Vec::new()));
        bus.subscribe("proposal.created", Arc::new(IdRecorder { ids: ids.clone() }));

        for id in 1..=20 {
            bus.publish(sample_event(id)).await.unwrap();
        }

        wait_until(|| ids.lock().unwrap().len() == 20).await;
        bus.shutdown().await;

        assert_eq!(*ids.lock().unwrap(), (1..=20).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn pool_delivers_each_event_exactly_once_per_handler() {
        let bus = AsyncEventBus::start(4, 8);
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        bus.subscribe(
            "proposal.created",
            Arc::new(Counting {
                count: first.clone(),
            }),
        );
        bus.subscribe(
            "proposal.created",
            Arc::new(Counting {
                count: second.clone(),
            }),
        );

        for id in 0..50 {
            bus.publish(sample_event(id)).await.unwrap();
        }

        wait_until(|| {
            first.load(Ordering::SeqCst) == 50 && second.load(Ordering::SeqCst) == 50
        })
        .await;
        bus.shutdown().await;

        // No duplication or loss once the pool has drained.
        assert_eq!(first.load(Ordering::SeqCst), 50);
        assert_eq!(second.load(Ordering::SeqCst), 50);
    }

    #[tokio::test]
    async fn publish_fails_fast_after_shutdown() {
        let bus = AsyncEventBus::start(2, 4);
        bus.shutdown().await;

        let err = bus.publish(sample_event(1)).await.unwrap_err();
        assert!(matches!(err, PublishError::ShuttingDown));
    }

    #[tokio::test]
    async fn shutdown_unblocks_a_publisher_stuck_on_a_full_queue() {
        // One-slot queue and a handler that never finishes quickly, so a
        // second publish must block on backpressure.
        struct Slow;

        #[async_trait]
        impl EventHandler for Slow {
            async fn handle(&self, _event: &DomainEvent) -> anyhow::Result<()> {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }
        }

        let bus = Arc::new(AsyncEventBus::start(1, 1));
        bus.subscribe("proposal.created", Arc::new(Slow));

        // First event occupies the worker, the next fills the queue.
        bus.publish(sample_event(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        bus.publish(sample_event(2)).await.unwrap();

        let blocked = {
            let bus = bus.clone();
            tokio::spawn(async move { bus.publish(sample_event(3)).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!blocked.is_finished());

        bus.shutdown.trigger();
        let result = tokio::time::timeout(Duration::from_secs(1), blocked)
            .await
            .expect("publisher stayed blocked past shutdown")
            .unwrap();
        assert!(matches!(result, Err(PublishError::ShuttingDown)));
    }
}
