//! Priority scheduler for pending transactions.
//!
//! Pending transactions are totally ordered by a composite key: value
//! descending, then admission sequence ascending. `HeapScheduler` is the
//! binary-heap implementation; the `Scheduler` trait lets tests and
//! alternative structures stand in for it.

mod heap;
mod types;

pub use heap::HeapScheduler;
pub use types::*;
