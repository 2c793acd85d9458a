//! Types for transaction records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while parsing an inbound payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// Payload was not valid JSON, or required fields were missing or of
    /// the wrong type.
    #[error("invalid payload: {0}")]
    Invalid(#[from] serde_json::Error),

    /// Monetary value was negative or not a finite number.
    #[error("invalid value {0}: must be a non-negative finite number")]
    InvalidValue(f64),
}

/// A monetary transaction pulled off the message queue.
///
/// Immutable once admitted into the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, e.g. "txn_1".
    pub id: String,
    /// Monetary value. Non-negative, drives scheduling priority.
    pub value: f64,
    /// Point in time of origination (ISO-8601 on the wire).
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Parse and validate a raw message payload.
    ///
    /// The expected shape is `{"id": string, "value": number,
    /// "timestamp": ISO-8601 string}`.
    pub fn from_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let tx: Transaction = serde_json::from_slice(payload)?;
        if !tx.value.is_finite() || tx.value < 0.0 {
            return Err(PayloadError::InvalidValue(tx.value));
        }
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_payload() {
        let payload = br#"{"id": "txn_1", "value": 500, "timestamp": "2023-10-01T10:00:00Z"}"#;
        let tx = Transaction::from_payload(payload).unwrap();
        assert_eq!(tx.id, "txn_1");
        assert_eq!(tx.value, 500.0);
        assert_eq!(tx.timestamp.to_rfc3339(), "2023-10-01T10:00:00+00:00");
    }

    #[test]
    fn test_parse_missing_field() {
        let payload = br#"{"id": "txn_1", "timestamp": "2023-10-01T10:00:00Z"}"#;
        let result = Transaction::from_payload(payload);
        assert!(matches!(result, Err(PayloadError::Invalid(_))));
    }

    #[test]
    fn test_parse_wrong_type() {
        let payload = br#"{"id": "txn_1", "value": "lots", "timestamp": "2023-10-01T10:00:00Z"}"#;
        let result = Transaction::from_payload(payload);
        assert!(matches!(result, Err(PayloadError::Invalid(_))));
    }

    #[test]
    fn test_parse_not_json() {
        let result = Transaction::from_payload(b"not json at all");
        assert!(matches!(result, Err(PayloadError::Invalid(_))));
    }

    #[test]
    fn test_parse_negative_value() {
        let payload = br#"{"id": "txn_1", "value": -1.0, "timestamp": "2023-10-01T10:00:00Z"}"#;
        let result = Transaction::from_payload(payload);
        assert!(matches!(result, Err(PayloadError::InvalidValue(_))));
    }

    #[test]
    fn test_transaction_roundtrip() {
        let tx = Transaction {
            id: "txn_42".to_string(),
            value: 1234.56,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&tx).unwrap();
        let parsed: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, "txn_42");
        assert_eq!(parsed.value, 1234.56);
    }
}
