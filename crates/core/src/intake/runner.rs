//! Intake loop implementation.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::metrics;
use crate::queue::{Delivery, MessageQueue};
use crate::scheduler::Scheduler;
use crate::transaction::Transaction;

use super::types::IntakeError;

/// The intake stage - receives messages and admits them into the scheduler.
///
/// Acknowledgement is deferred: the ack handle travels with the admitted
/// entry and is resolved by the worker that processes it. Intake only
/// nacks, and only when a payload fails validation or admission fails.
pub struct IntakeStage {
    queue: Arc<dyn MessageQueue>,
    scheduler: Arc<dyn Scheduler>,
}

impl IntakeStage {
    pub fn new(queue: Arc<dyn MessageQueue>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self { queue, scheduler }
    }

    /// Run the intake loop until shutdown is signalled or the queue closes.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        info!(queue = self.queue.name(), "Intake stage started");
        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Intake stage received shutdown signal");
                    break;
                }
                received = self.queue.receive() => {
                    match received {
                        Ok(Some(delivery)) => {
                            if let Err(IntakeError::Scheduler(e)) = self.admit_delivery(delivery).await {
                                error!("Scheduler exhausted, stopping intake: {}", e);
                                break;
                            }
                        }
                        Ok(None) => {
                            info!("Queue closed, stopping intake");
                            break;
                        }
                        Err(e) => {
                            // Transient broker errors are retried; only
                            // closure or exhaustion stops the loop.
                            warn!("Queue receive error: {}", e);
                        }
                    }
                }
            }
        }
        info!("Intake stage stopped");
    }

    /// Validate one delivery and admit it into the scheduler.
    ///
    /// A malformed payload is nacked and surfaced as an error, but is not
    /// fatal to the loop; a scheduler failure is.
    async fn admit_delivery(&self, delivery: Delivery) -> Result<u64, IntakeError> {
        let transaction = match Transaction::from_payload(&delivery.payload) {
            Ok(tx) => tx,
            Err(e) => {
                metrics::PAYLOADS_MALFORMED.inc();
                warn!(tag = delivery.handle.tag(), "Rejecting malformed payload: {}", e);
                if let Err(nack_err) = self.queue.nack(delivery.handle).await {
                    warn!("Failed to nack malformed payload: {}", nack_err);
                }
                return Err(e.into());
            }
        };

        match self.scheduler.admit(transaction, delivery.handle) {
            Ok(seq) => {
                metrics::TRANSACTIONS_ADMITTED.inc();
                debug!(seq, "Transaction admitted");
                Ok(seq)
            }
            Err(e) => {
                // The triggering message must not be acknowledged.
                if let Err(nack_err) = self.queue.nack(delivery.handle).await {
                    warn!("Failed to nack on admission failure: {}", nack_err);
                }
                Err(e.into())
            }
        }
    }
}
