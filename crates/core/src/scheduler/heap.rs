//! Binary-heap scheduler implementation.

use std::collections::BinaryHeap;
use std::sync::{Mutex, PoisonError};

use tracing::trace;

use crate::metrics;
use crate::queue::AckHandle;
use crate::transaction::Transaction;

use super::types::{PendingEntry, Scheduler, SchedulerError};

struct HeapState {
    heap: BinaryHeap<PendingEntry>,
    next_seq: u64,
}

/// Max-heap scheduler protected by a single mutex.
///
/// The heap and the sequence counter share the one lock, so admission
/// order and sequence numbers can never race: two entries with identical
/// value and timestamp still extract in admission order.
pub struct HeapScheduler {
    state: Mutex<HeapState>,
    /// Maximum resident entries; 0 means unbounded.
    max_pending: usize,
}

impl HeapScheduler {
    pub fn new(max_pending: usize) -> Self {
        Self {
            state: Mutex::new(HeapState {
                heap: BinaryHeap::new(),
                next_seq: 0,
            }),
            max_pending,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HeapState> {
        // A panic while holding the lock leaves the heap structurally
        // intact, so recover the guard rather than propagate the poison.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for HeapScheduler {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Scheduler for HeapScheduler {
    fn admit(&self, transaction: Transaction, handle: AckHandle) -> Result<u64, SchedulerError> {
        let mut state = self.lock();

        if self.max_pending > 0 && state.heap.len() >= self.max_pending {
            return Err(SchedulerError::Exhausted {
                pending: state.heap.len(),
                capacity: self.max_pending,
            });
        }

        let seq = state.next_seq;
        state.next_seq += 1;

        trace!(transaction_id = %transaction.id, value = transaction.value, seq, "admitted");
        state.heap.push(PendingEntry {
            transaction,
            seq,
            handle,
        });
        metrics::PENDING_DEPTH.set(state.heap.len() as i64);

        Ok(seq)
    }

    fn extract_max(&self) -> Option<PendingEntry> {
        let mut state = self.lock();
        let entry = state.heap.pop();
        metrics::PENDING_DEPTH.set(state.heap.len() as i64);
        entry
    }

    fn size(&self) -> usize {
        self.lock().heap.len()
    }

    fn drain(&self) -> Vec<PendingEntry> {
        let mut state = self.lock();
        let drained = std::mem::take(&mut state.heap).into_sorted_vec();
        metrics::PENDING_DEPTH.set(0);
        // into_sorted_vec is ascending; surface greatest first.
        drained.into_iter().rev().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use std::sync::Arc;

    fn admit(scheduler: &HeapScheduler, id: &str, value: f64) -> u64 {
        scheduler
            .admit(fixtures::transaction(id, value), AckHandle::new(0))
            .unwrap()
    }

    #[test]
    fn test_extracts_highest_value_first() {
        let scheduler = HeapScheduler::new(0);
        admit(&scheduler, "txn_1", 500.0);
        admit(&scheduler, "txn_2", 1500.0);
        admit(&scheduler, "txn_3", 300.0);

        let order: Vec<String> = std::iter::from_fn(|| scheduler.extract_max())
            .map(|e| e.transaction.id)
            .collect();
        assert_eq!(order, vec!["txn_2", "txn_1", "txn_3"]);
    }

    #[test]
    fn test_equal_values_extract_in_admission_order() {
        let scheduler = HeapScheduler::new(0);
        admit(&scheduler, "a", 1000.0);
        admit(&scheduler, "b", 1000.0);

        assert_eq!(scheduler.extract_max().unwrap().transaction.id, "a");
        assert_eq!(scheduler.extract_max().unwrap().transaction.id, "b");
    }

    #[test]
    fn test_identical_value_and_timestamp_tie_break_by_seq() {
        let scheduler = HeapScheduler::new(0);
        let ts = fixtures::transaction("a", 1000.0).timestamp;
        for id in ["a", "b", "c"] {
            let tx = Transaction {
                id: id.to_string(),
                value: 1000.0,
                timestamp: ts,
            };
            scheduler.admit(tx, AckHandle::new(0)).unwrap();
        }

        let order: Vec<String> = std::iter::from_fn(|| scheduler.extract_max())
            .map(|e| e.transaction.id)
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_extract_is_repeatable() {
        let scheduler = HeapScheduler::new(0);
        assert!(scheduler.extract_max().is_none());
        assert!(scheduler.extract_max().is_none());
        assert_eq!(scheduler.size(), 0);
    }

    #[test]
    fn test_extraction_order_is_non_increasing_with_fifo_ties() {
        let scheduler = HeapScheduler::new(0);
        let values = [50.0, 900.0, 50.0, 1200.0, 900.0, 0.0, 1200.0, 50.0];
        for (i, value) in values.iter().enumerate() {
            admit(&scheduler, &format!("txn_{i}"), *value);
        }

        let extracted: Vec<PendingEntry> =
            std::iter::from_fn(|| scheduler.extract_max()).collect();
        assert_eq!(extracted.len(), values.len());

        for pair in extracted.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            assert!(prev.transaction.value >= next.transaction.value);
            if prev.transaction.value == next.transaction.value {
                assert!(prev.seq < next.seq);
            }
        }
    }

    #[test]
    fn test_capacity_bound_reports_exhaustion() {
        let scheduler = HeapScheduler::new(2);
        admit(&scheduler, "a", 1.0);
        admit(&scheduler, "b", 2.0);

        let result = scheduler.admit(fixtures::transaction("c", 3.0), AckHandle::new(0));
        assert!(matches!(
            result,
            Err(SchedulerError::Exhausted {
                pending: 2,
                capacity: 2
            })
        ));
        assert_eq!(scheduler.size(), 2);
    }

    #[test]
    fn test_drain_returns_greatest_first_and_empties() {
        let scheduler = HeapScheduler::new(0);
        admit(&scheduler, "low", 10.0);
        admit(&scheduler, "high", 999.0);

        let drained = scheduler.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].transaction.id, "high");
        assert_eq!(drained[1].transaction.id, "low");
        assert_eq!(scheduler.size(), 0);
    }

    #[test]
    fn test_concurrent_admission_assigns_unique_seqs() {
        let scheduler = Arc::new(HeapScheduler::new(0));
        let producers = 4;
        let per_producer = 250;

        let handles: Vec<_> = (0..producers)
            .map(|p| {
                let scheduler = Arc::clone(&scheduler);
                std::thread::spawn(move || {
                    let mut seqs = Vec::with_capacity(per_producer);
                    for i in 0..per_producer {
                        let id = format!("p{p}_{i}");
                        let value = ((p * 31 + i * 7) % 100) as f64;
                        let seq = scheduler
                            .admit(fixtures::transaction(&id, value), AckHandle::new(0))
                            .unwrap();
                        seqs.push(seq);
                    }
                    seqs
                })
            })
            .collect();

        let mut all_seqs: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all_seqs.sort_unstable();
        all_seqs.dedup();
        assert_eq!(all_seqs.len(), producers * per_producer);
        assert_eq!(scheduler.size(), producers * per_producer);
    }

    #[test]
    fn test_concurrent_extraction_delivers_each_entry_once() {
        let scheduler = Arc::new(HeapScheduler::new(0));
        let total = 1000;
        for i in 0..total {
            admit(&scheduler, &format!("txn_{i}"), (i % 100) as f64);
        }

        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let scheduler = Arc::clone(&scheduler);
                std::thread::spawn(move || {
                    let mut seen = Vec::new();
                    while let Some(entry) = scheduler.extract_max() {
                        seen.push(entry.seq);
                    }
                    seen
                })
            })
            .collect();

        let mut all_seqs: Vec<u64> = consumers
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(all_seqs.len(), total);
        all_seqs.sort_unstable();
        all_seqs.dedup();
        assert_eq!(all_seqs.len(), total);
        assert_eq!(scheduler.size(), 0);
    }
}
