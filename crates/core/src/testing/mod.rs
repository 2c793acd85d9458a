//! Testing utilities and mock implementations.
//!
//! `MemoryQueue` already serves as the queue double; this module adds a
//! controllable processor and transaction fixtures for driving the
//! dispatcher in tests without real infrastructure.

mod mock_processor;

pub use mock_processor::MockProcessor;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::transaction::Transaction;

    /// Create a test transaction with a fixed timestamp.
    pub fn transaction(id: &str, value: f64) -> Transaction {
        Transaction {
            id: id.to_string(),
            value,
            timestamp: Utc.with_ymd_and_hms(2023, 10, 1, 10, 0, 0).unwrap(),
        }
    }

    /// Serialize a transaction the way the wire payload looks.
    pub fn payload(id: &str, value: f64) -> Vec<u8> {
        serde_json::to_vec(&transaction(id, value)).unwrap()
    }
}
