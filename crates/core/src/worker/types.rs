//! Types for worker operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transaction::Transaction;

/// Errors produced by a processing function.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The processing function failed for this transaction.
    #[error("processing failed: {0}")]
    Failed(String),
}

/// Trait for transaction processing functions.
#[async_trait]
pub trait Processor: Send + Sync {
    /// Processor name for logging.
    fn name(&self) -> &str;

    /// Execute the processing function for one transaction.
    async fn process(&self, transaction: &Transaction) -> Result<(), ProcessingError>;
}

/// Outcome of processing a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }
}

/// Structured record emitted once per processed transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub transaction_id: String,
    pub value: f64,
    pub outcome: Outcome,
    pub processed_at: DateTime<Utc>,
    /// Present when `outcome` is `Failure`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What to do with the source message after a processing failure.
///
/// Re-admitting a priority-ordered item changes its fairness
/// characteristics, so escalation is never implicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureDisposition {
    /// Acknowledge the message; the transaction is dropped.
    Ack,
    /// Reject the message, handing it to the source's dead-letter or
    /// redelivery policy.
    Nack,
}

/// Trait for failure escalation policies.
#[async_trait]
pub trait FailureHook: Send + Sync {
    /// Decide the disposition of the source message for a failed
    /// transaction. The entry is never re-admitted by the worker itself.
    async fn on_failure(
        &self,
        transaction: &Transaction,
        error: &ProcessingError,
    ) -> FailureDisposition;
}

/// Default failure policy: reject the message so the source's own
/// dead-letter or redelivery mechanism takes over.
#[derive(Debug, Default)]
pub struct NackOnFailure;

#[async_trait]
impl FailureHook for NackOnFailure {
    async fn on_failure(
        &self,
        _transaction: &Transaction,
        _error: &ProcessingError,
    ) -> FailureDisposition {
        FailureDisposition::Nack
    }
}
