//! Mock processor for testing.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::transaction::Transaction;
use crate::worker::{ProcessingError, Processor};

/// Mock implementation of the Processor trait.
///
/// Provides controllable behavior for testing:
/// - Record processed transactions for assertions
/// - Fail configurable transaction ids
/// - Simulate slow processing with a per-call delay
pub struct MockProcessor {
    processed: RwLock<Vec<Transaction>>,
    failures: RwLock<HashSet<String>>,
    delay: RwLock<Option<Duration>>,
}

impl MockProcessor {
    pub fn new() -> Self {
        Self {
            processed: RwLock::new(Vec::new()),
            failures: RwLock::new(HashSet::new()),
            delay: RwLock::new(None),
        }
    }

    /// Make processing fail for the given transaction id.
    pub async fn fail_on(&self, id: &str) {
        self.failures.write().await.insert(id.to_string());
    }

    /// Add a delay to every process call.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Ids of processed transactions, in processing order. Includes
    /// transactions whose processing failed.
    pub async fn processed_ids(&self) -> Vec<String> {
        self.processed
            .read()
            .await
            .iter()
            .map(|tx| tx.id.clone())
            .collect()
    }

    /// Number of process calls so far.
    pub async fn processed_count(&self) -> usize {
        self.processed.read().await.len()
    }
}

impl Default for MockProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Processor for MockProcessor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn process(&self, transaction: &Transaction) -> Result<(), ProcessingError> {
        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.processed.write().await.push(transaction.clone());

        if self.failures.read().await.contains(&transaction.id) {
            return Err(ProcessingError::Failed(format!(
                "mock failure for {}",
                transaction.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_records_processed_transactions() {
        let processor = MockProcessor::new();
        processor
            .process(&fixtures::transaction("txn_1", 1.0))
            .await
            .unwrap();
        assert_eq!(processor.processed_ids().await, vec!["txn_1"]);
        assert_eq!(processor.processed_count().await, 1);
    }

    #[tokio::test]
    async fn test_configured_failure() {
        let processor = MockProcessor::new();
        processor.fail_on("txn_bad").await;

        let result = processor.process(&fixtures::transaction("txn_bad", 1.0)).await;
        assert!(matches!(result, Err(ProcessingError::Failed(_))));
        // Failed transactions are still recorded.
        assert_eq!(processor.processed_count().await, 1);
    }
}
