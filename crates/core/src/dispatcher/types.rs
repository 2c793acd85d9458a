//! Types for the dispatcher.

use serde::{Deserialize, Serialize};

/// Current status of the dispatcher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatcherStatus {
    /// Whether the dispatcher is running.
    pub running: bool,
    /// Entries currently resident in the scheduler (advisory).
    pub pending: usize,
    /// Number of worker loops.
    pub worker_count: usize,
}
