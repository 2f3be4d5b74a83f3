//! Prometheus metrics for the triage engine.
//!
//! The observability side-channel: which model answered, which stage failed,
//! how often the rule fallback fired. Metrics never block or alter the
//! returned decision.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

/// Accepted decisions by source (model name or "rule_fallback").
pub static CLASSIFICATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "deskbrain_classifications_total",
            "Total decisions returned, by confidence source",
        ),
        &["source"],
    )
    .unwrap()
});

/// Per-attempt outcomes across the model list.
pub static MODEL_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("deskbrain_model_attempts_total", "Total model attempts"),
        &["model", "outcome"], // "accepted", "invocation_error", "extraction_error", "validation_error"
    )
    .unwrap()
});

/// Stricter-prompt repair re-invocations.
pub static REPAIR_ATTEMPTS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "deskbrain_repair_attempts_total",
        "Total stricter-prompt repair attempts",
    )
    .unwrap()
});

/// Context retrievals that failed or returned nothing.
pub static RETRIEVAL_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "deskbrain_retrieval_failures_total",
        "Total context retrievals skipped after failure or empty result",
    )
    .unwrap()
});

/// End-to-end classification latency by source.
pub static CLASSIFICATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "deskbrain_classification_duration_seconds",
            "Duration of a full classification call",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 15.0, 45.0, 120.0]),
        &["source"],
    )
    .unwrap()
});

/// Get all engine metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CLASSIFICATIONS_TOTAL.clone()),
        Box::new(MODEL_ATTEMPTS.clone()),
        Box::new(REPAIR_ATTEMPTS.clone()),
        Box::new(RETRIEVAL_FAILURES.clone()),
        Box::new(CLASSIFICATION_DURATION.clone()),
    ]
}
