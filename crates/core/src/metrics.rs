//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Intake (admissions, malformed payloads)
//! - Scheduler (pending depth)
//! - Workers (processed transactions, processing duration)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry};

/// Transactions admitted into the scheduler.
pub static TRANSACTIONS_ADMITTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "teller_transactions_admitted_total",
        "Total transactions admitted into the scheduler",
    )
    .unwrap()
});

/// Payloads rejected at intake.
pub static PAYLOADS_MALFORMED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "teller_payloads_malformed_total",
        "Total inbound payloads rejected as malformed",
    )
    .unwrap()
});

/// Transactions processed by workers, by outcome.
pub static TRANSACTIONS_PROCESSED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "teller_transactions_processed_total",
            "Total transactions processed by workers",
        ),
        &["outcome"], // "success", "failure"
    )
    .unwrap()
});

/// Entries currently resident in the scheduler.
pub static PENDING_DEPTH: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "teller_pending_depth",
        "Entries currently resident in the scheduler",
    )
    .unwrap()
});

/// Processing function duration in seconds.
pub static PROCESSING_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "teller_processing_duration_seconds",
            "Duration of the worker processing function",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]),
    )
    .unwrap()
});

/// Register all core metrics with the given registry.
pub fn register_core_metrics(registry: &Registry) {
    let _ = registry.register(Box::new(TRANSACTIONS_ADMITTED.clone()));
    let _ = registry.register(Box::new(PAYLOADS_MALFORMED.clone()));
    let _ = registry.register(Box::new(TRANSACTIONS_PROCESSED.clone()));
    let _ = registry.register(Box::new(PENDING_DEPTH.clone()));
    let _ = registry.register(Box::new(PROCESSING_DURATION.clone()));
}
