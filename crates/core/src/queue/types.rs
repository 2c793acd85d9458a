//! Types for message queue operations.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during queue operations.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue is closed and will deliver no further messages.
    #[error("queue closed")]
    Closed,

    /// Ack/nack referenced a delivery the queue is not tracking.
    #[error("unknown delivery tag: {0}")]
    UnknownDelivery(u64),

    /// Internal error.
    #[error("internal queue error: {0}")]
    Internal(String),
}

/// Opaque handle referencing an in-flight delivery.
///
/// Travels with the transaction from intake to the worker that finally
/// acknowledges it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AckHandle(u64);

impl AckHandle {
    pub fn new(tag: u64) -> Self {
        Self(tag)
    }

    /// Delivery tag as assigned by the queue backend.
    pub fn tag(&self) -> u64 {
        self.0
    }
}

/// A single message delivered by the queue.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Raw message payload.
    pub payload: Vec<u8>,
    /// Handle to ack or nack this delivery later.
    pub handle: AckHandle,
}

/// Trait for message queue backends.
///
/// Deliveries are at-least-once: a message stays outstanding until it is
/// acked, and a nacked message is routed to the backend's dead-letter or
/// redelivery policy.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Wait for the next message. Returns `Ok(None)` once the queue is
    /// closed and fully drained.
    async fn receive(&self) -> Result<Option<Delivery>, QueueError>;

    /// Acknowledge a delivery as fully processed.
    async fn ack(&self, handle: AckHandle) -> Result<(), QueueError>;

    /// Reject a delivery, handing it to the backend's dead-letter or
    /// redelivery policy.
    async fn nack(&self, handle: AckHandle) -> Result<(), QueueError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_handle_tag() {
        let handle = AckHandle::new(42);
        assert_eq!(handle.tag(), 42);
    }

    #[test]
    fn test_error_display() {
        let err = QueueError::UnknownDelivery(7);
        assert_eq!(err.to_string(), "unknown delivery tag: 7");
        assert_eq!(QueueError::Closed.to_string(), "queue closed");
    }
}
