//! Worker loop implementation.
//!
//! Per-worker state machine:
//! Idle -> Extracting -> Processing -> Acknowledging -> Idle,
//! with Backoff -> Idle when extraction finds nothing. The loop only
//! terminates on the shutdown signal, checked at the top of each
//! iteration; in-flight processing always completes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::metrics;
use crate::queue::MessageQueue;
use crate::scheduler::{PendingEntry, Scheduler};

use super::types::{
    CompletionRecord, FailureDisposition, FailureHook, Outcome, Processor,
};

/// A single worker draining the scheduler.
pub struct Worker {
    id: usize,
    scheduler: Arc<dyn Scheduler>,
    queue: Arc<dyn MessageQueue>,
    processor: Arc<dyn Processor>,
    failure_hook: Arc<dyn FailureHook>,
    backoff: Duration,
}

impl Worker {
    pub fn new(
        id: usize,
        scheduler: Arc<dyn Scheduler>,
        queue: Arc<dyn MessageQueue>,
        processor: Arc<dyn Processor>,
        failure_hook: Arc<dyn FailureHook>,
        backoff: Duration,
    ) -> Self {
        Self {
            id,
            scheduler,
            queue,
            processor,
            failure_hook,
            backoff,
        }
    }

    /// Run the worker loop until shutdown is signalled.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        info!(worker = self.id, processor = self.processor.name(), "Worker started");
        loop {
            match shutdown.try_recv() {
                Err(broadcast::error::TryRecvError::Empty) => {}
                _ => {
                    info!(worker = self.id, "Worker received shutdown signal");
                    break;
                }
            }

            match self.scheduler.extract_max() {
                Some(entry) => self.process_entry(entry).await,
                None => {
                    // Bounded backoff instead of busy-spinning on an
                    // empty scheduler.
                    tokio::select! {
                        _ = shutdown.recv() => {
                            info!(worker = self.id, "Worker received shutdown signal");
                            break;
                        }
                        _ = tokio::time::sleep(self.backoff) => {}
                    }
                }
            }
        }
        info!(worker = self.id, "Worker stopped");
    }

    /// Process one extracted entry and resolve its source message.
    async fn process_entry(&self, entry: PendingEntry) {
        let started = Instant::now();
        let result = self.processor.process(&entry.transaction).await;
        metrics::PROCESSING_DURATION.observe(started.elapsed().as_secs_f64());

        let record = match result {
            Ok(()) => {
                if let Err(e) = self.queue.ack(entry.handle).await {
                    warn!(worker = self.id, "Failed to ack processed message: {}", e);
                }
                CompletionRecord {
                    transaction_id: entry.transaction.id.clone(),
                    value: entry.transaction.value,
                    outcome: Outcome::Success,
                    processed_at: Utc::now(),
                    error: None,
                }
            }
            Err(e) => {
                // Never re-admitted here; the hook owns escalation.
                let disposition = self.failure_hook.on_failure(&entry.transaction, &e).await;
                let resolve = match disposition {
                    FailureDisposition::Ack => self.queue.ack(entry.handle).await,
                    FailureDisposition::Nack => self.queue.nack(entry.handle).await,
                };
                if let Err(resolve_err) = resolve {
                    warn!(
                        worker = self.id,
                        "Failed to resolve message after processing failure: {}", resolve_err
                    );
                }
                CompletionRecord {
                    transaction_id: entry.transaction.id.clone(),
                    value: entry.transaction.value,
                    outcome: Outcome::Failure,
                    processed_at: Utc::now(),
                    error: Some(e.to_string()),
                }
            }
        };

        metrics::TRANSACTIONS_PROCESSED
            .with_label_values(&[record.outcome.as_str()])
            .inc();
        info!(
            worker = self.id,
            transaction_id = %record.transaction_id,
            value = record.value,
            outcome = record.outcome.as_str(),
            processed_at = %record.processed_at.to_rfc3339(),
            "Transaction completed"
        );
    }
}
