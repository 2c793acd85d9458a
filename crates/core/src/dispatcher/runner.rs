//! Dispatcher implementation.
//!
//! Drives transactions through the pipeline:
//! - Intake: single loop bridging the queue into the scheduler
//! - Workers: configurable pool draining the scheduler by priority

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::intake::IntakeStage;
use crate::queue::MessageQueue;
use crate::scheduler::Scheduler;
use crate::worker::{FailureHook, NackOnFailure, Processor, Worker};

use super::config::DispatcherConfig;
use super::types::DispatcherStatus;

/// The transaction dispatcher - owns intake and worker lifecycles.
pub struct Dispatcher {
    config: DispatcherConfig,
    queue: Arc<dyn MessageQueue>,
    scheduler: Arc<dyn Scheduler>,
    processor: Arc<dyn Processor>,
    failure_hook: Arc<dyn FailureHook>,

    // Runtime state
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Dispatcher {
    /// Create a new dispatcher with the default failure policy (nack).
    pub fn new(
        config: DispatcherConfig,
        queue: Arc<dyn MessageQueue>,
        scheduler: Arc<dyn Scheduler>,
        processor: Arc<dyn Processor>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            queue,
            scheduler,
            processor,
            failure_hook: Arc::new(NackOnFailure),
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Set a custom failure escalation policy.
    pub fn with_failure_hook(mut self, hook: Arc<dyn FailureHook>) -> Self {
        self.failure_hook = hook;
        self
    }

    /// Start the dispatcher (spawns intake and worker tasks).
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Dispatcher already running");
            return;
        }

        info!(workers = self.config.worker_count, "Starting dispatcher");

        let mut tasks = self.tasks.lock().await;

        let intake = IntakeStage::new(Arc::clone(&self.queue), Arc::clone(&self.scheduler));
        tasks.push(tokio::spawn(intake.run(self.shutdown_tx.subscribe())));

        let backoff = Duration::from_millis(self.config.backoff_ms);
        for id in 0..self.config.worker_count {
            let worker = Worker::new(
                id,
                Arc::clone(&self.scheduler),
                Arc::clone(&self.queue),
                Arc::clone(&self.processor),
                Arc::clone(&self.failure_hook),
                backoff,
            );
            tasks.push(tokio::spawn(worker.run(self.shutdown_tx.subscribe())));
        }

        info!("Dispatcher started");
    }

    /// Stop the dispatcher gracefully.
    ///
    /// Intake stops admitting, workers finish any in-flight processing,
    /// and every entry still resident in the scheduler is logged and
    /// nacked back to the source. Nothing is silently dropped.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Dispatcher not running");
            return;
        }

        info!("Stopping dispatcher");
        let _ = self.shutdown_tx.send(());

        let tasks: Vec<JoinHandle<()>> = self.tasks.lock().await.drain(..).collect();
        join_all(tasks).await;

        self.surface_unprocessed().await;
        info!("Dispatcher stopped");
    }

    /// Get current dispatcher status.
    pub fn status(&self) -> DispatcherStatus {
        DispatcherStatus {
            running: self.running.load(Ordering::Relaxed),
            pending: self.scheduler.size(),
            worker_count: self.config.worker_count,
        }
    }

    /// Log and nack every entry left in the scheduler at shutdown.
    async fn surface_unprocessed(&self) {
        let remaining = self.scheduler.drain();
        if remaining.is_empty() {
            return;
        }

        warn!(
            count = remaining.len(),
            "Entries unprocessed at shutdown, returning to source"
        );
        for entry in remaining {
            warn!(
                transaction_id = %entry.transaction.id,
                value = entry.transaction.value,
                seq = entry.seq,
                "Unprocessed at shutdown"
            );
            if let Err(e) = self.queue.nack(entry.handle).await {
                warn!(
                    transaction_id = %entry.transaction.id,
                    "Failed to return unprocessed entry to source: {}", e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::MemoryQueue;
    use crate::scheduler::HeapScheduler;
    use crate::testing::MockProcessor;

    fn dispatcher() -> (Dispatcher, Arc<MemoryQueue>, Arc<MockProcessor>) {
        let queue = Arc::new(MemoryQueue::new(64));
        let scheduler = Arc::new(HeapScheduler::new(0));
        let processor = Arc::new(MockProcessor::new());
        let dispatcher = Dispatcher::new(
            DispatcherConfig::default(),
            Arc::clone(&queue) as Arc<dyn MessageQueue>,
            scheduler as Arc<dyn Scheduler>,
            Arc::clone(&processor) as Arc<dyn Processor>,
        );
        (dispatcher, queue, processor)
    }

    #[tokio::test]
    async fn test_status_before_start() {
        let (dispatcher, _, _) = dispatcher();
        let status = dispatcher.status();
        assert!(!status.running);
        assert_eq!(status.pending, 0);
        assert_eq!(status.worker_count, 1);
    }

    #[tokio::test]
    async fn test_start_stop_toggles_running() {
        let (dispatcher, _, _) = dispatcher();
        dispatcher.start().await;
        assert!(dispatcher.status().running);
        dispatcher.stop().await;
        assert!(!dispatcher.status().running);
    }

    #[tokio::test]
    async fn test_double_start_is_harmless() {
        let (dispatcher, _, _) = dispatcher();
        dispatcher.start().await;
        dispatcher.start().await;
        dispatcher.stop().await;
        assert!(!dispatcher.status().running);
    }
}
