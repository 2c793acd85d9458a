//! Dispatcher configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the transaction dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Number of concurrent worker loops.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// How long a worker sleeps after finding the scheduler empty
    /// (milliseconds).
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_worker_count() -> usize {
    1
}

fn default_backoff_ms() -> u64 {
    25
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            backoff_ms: default_backoff_ms(),
        }
    }
}
