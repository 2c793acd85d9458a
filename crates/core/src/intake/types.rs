//! Types for the intake stage.

use thiserror::Error;

use crate::queue::QueueError;
use crate::scheduler::SchedulerError;
use crate::transaction::PayloadError;

/// Errors that can occur while admitting a delivery.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Payload failed validation. The message is rejected back to the
    /// source; intake never retries it internally.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] PayloadError),

    /// Scheduler refused the admission. Fatal for the intake loop.
    #[error("scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// Queue error while receiving or rejecting a message.
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),
}
