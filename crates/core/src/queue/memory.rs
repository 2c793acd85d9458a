//! In-process message queue backed by a tokio channel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex as StdMutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use super::types::{AckHandle, Delivery, MessageQueue, QueueError};

/// In-memory `MessageQueue` implementation.
///
/// Publishers push raw payloads; consumers receive tagged deliveries and
/// must ack or nack each one. Nacked payloads land in an internal
/// dead-letter buffer rather than being redelivered, so a poison message
/// cannot loop forever. The buffer is inspectable for tests and operator
/// tooling.
///
/// The bookkeeping maps use blocking mutexes with await-free critical
/// sections: once `receive` pulls a payload off the channel it registers
/// the delivery synchronously, so cancelling the future at any await
/// point can never strand a payload outside both the channel and the
/// unacked map.
pub struct MemoryQueue {
    name: String,
    sender: mpsc::Sender<Vec<u8>>,
    receiver: Mutex<mpsc::Receiver<Vec<u8>>>,
    unacked: StdMutex<HashMap<u64, Vec<u8>>>,
    dead_letters: StdMutex<Vec<Vec<u8>>>,
    next_tag: AtomicU64,
    acked_total: AtomicU64,
    nacked_total: AtomicU64,
}

impl MemoryQueue {
    /// Create a queue with the given channel buffer size.
    pub fn new(buffer: usize) -> Self {
        let (sender, receiver) = mpsc::channel(buffer);
        Self {
            name: "memory".to_string(),
            sender,
            receiver: Mutex::new(receiver),
            unacked: StdMutex::new(HashMap::new()),
            dead_letters: StdMutex::new(Vec::new()),
            next_tag: AtomicU64::new(1),
            acked_total: AtomicU64::new(0),
            nacked_total: AtomicU64::new(0),
        }
    }

    /// Publish a raw payload onto the queue.
    pub async fn publish(&self, payload: Vec<u8>) -> Result<(), QueueError> {
        self.sender
            .send(payload)
            .await
            .map_err(|_| QueueError::Closed)
    }

    /// Number of deliveries handed out but not yet acked or nacked.
    pub fn unacked_len(&self) -> usize {
        self.lock_unacked().len()
    }

    /// Payloads that were nacked, in nack order.
    pub fn dead_lettered(&self) -> Vec<Vec<u8>> {
        self.dead_letters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Total deliveries acknowledged over the queue's lifetime.
    pub fn acked_total(&self) -> u64 {
        self.acked_total.load(Ordering::Relaxed)
    }

    /// Total deliveries rejected over the queue's lifetime.
    pub fn nacked_total(&self) -> u64 {
        self.nacked_total.load(Ordering::Relaxed)
    }

    fn lock_unacked(&self) -> std::sync::MutexGuard<'_, HashMap<u64, Vec<u8>>> {
        self.unacked.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MessageQueue for MemoryQueue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn receive(&self) -> Result<Option<Delivery>, QueueError> {
        let payload = {
            let mut receiver = self.receiver.lock().await;
            receiver.recv().await
        };

        let Some(payload) = payload else {
            return Ok(None);
        };

        // No awaits past this point: the payload must be registered as
        // unacked before the caller can observe the future completing,
        // or a cancelled receive would lose it.
        let tag = self.next_tag.fetch_add(1, Ordering::Relaxed);
        self.lock_unacked().insert(tag, payload.clone());
        debug!(tag, bytes = payload.len(), "delivery handed out");

        Ok(Some(Delivery {
            payload,
            handle: AckHandle::new(tag),
        }))
    }

    async fn ack(&self, handle: AckHandle) -> Result<(), QueueError> {
        let removed = self.lock_unacked().remove(&handle.tag());
        match removed {
            Some(_) => {
                self.acked_total.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            None => Err(QueueError::UnknownDelivery(handle.tag())),
        }
    }

    async fn nack(&self, handle: AckHandle) -> Result<(), QueueError> {
        let removed = self.lock_unacked().remove(&handle.tag());
        match removed {
            Some(payload) => {
                self.dead_letters
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(payload);
                self.nacked_total.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            None => Err(QueueError::UnknownDelivery(handle.tag())),
        }
    }
}
