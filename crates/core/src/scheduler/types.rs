//! Types for the priority scheduler.

use std::cmp::Ordering;

use thiserror::Error;

use crate::queue::AckHandle;
use crate::transaction::Transaction;

/// Errors that can occur during scheduler operations.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The scheduler's capacity bound was hit. Fatal for the admitting
    /// caller; the triggering message must not be acknowledged.
    #[error("scheduler exhausted: {pending} entries pending, capacity {capacity}")]
    Exhausted { pending: usize, capacity: usize },
}

/// A transaction resident in the scheduler, wrapped with its admission
/// sequence number and the handle to its source message.
#[derive(Debug, Clone)]
pub struct PendingEntry {
    pub transaction: Transaction,
    /// Monotonic admission sequence number. Sole tie-break among equal
    /// values, regardless of timestamp resolution.
    pub seq: u64,
    /// Handle to ack or nack the original source message.
    pub handle: AckHandle,
}

impl PartialEq for PendingEntry {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for PendingEntry {}

impl Ord for PendingEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Greater value wins; among equal values the earlier admission
        // wins, so a lower seq must compare greater.
        self.transaction
            .value
            .total_cmp(&other.transaction.value)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PendingEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Trait for priority scheduler implementations.
///
/// Implementations must be safe for concurrent admission and extraction,
/// and must deliver each admitted entry at most once.
pub trait Scheduler: Send + Sync {
    /// Validate capacity, assign the next sequence number and insert, all
    /// in one critical section. Returns the assigned sequence number.
    fn admit(&self, transaction: Transaction, handle: AckHandle) -> Result<u64, SchedulerError>;

    /// Remove and return the entry with the greatest composite key.
    /// `None` is the explicit "no work" signal, not an error.
    fn extract_max(&self) -> Option<PendingEntry>;

    /// Advisory count of resident entries, for observability only.
    fn size(&self) -> usize;

    /// Remove and return every resident entry, greatest first. Used at
    /// shutdown to surface unprocessed work.
    fn drain(&self) -> Vec<PendingEntry>;
}
