//! Processor that logs transaction details.

use async_trait::async_trait;
use tracing::info;

use crate::transaction::Transaction;

use super::types::{ProcessingError, Processor};

/// Processor that logs each transaction and succeeds.
///
/// The daemon's default when no real downstream is wired in.
#[derive(Debug, Default)]
pub struct LoggingProcessor;

#[async_trait]
impl Processor for LoggingProcessor {
    fn name(&self) -> &str {
        "logging"
    }

    async fn process(&self, transaction: &Transaction) -> Result<(), ProcessingError> {
        info!(
            transaction_id = %transaction.id,
            value = transaction.value,
            timestamp = %transaction.timestamp.to_rfc3339(),
            "Processed transaction"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_logging_processor_succeeds() {
        let processor = LoggingProcessor;
        assert_eq!(processor.name(), "logging");
        let tx = fixtures::transaction("txn_1", 500.0);
        assert!(processor.process(&tx).await.is_ok());
    }
}
