//! Per-classification diagnostic types.

use crate::decision::ValidationError;
use crate::extract::ExtractionError;
use crate::model::InvocationError;

/// Outcome of one model attempt.
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    /// The invocation itself failed; no output to recover.
    InvocationFailed(InvocationError),
    /// Output arrived but no structure could be recovered from it.
    ExtractionFailed(ExtractionError),
    /// A structure was recovered but it violated the decision schema.
    ValidationFailed {
        raw: String,
        error: ValidationError,
    },
    /// The candidate passed validation.
    Accepted,
}

impl AttemptOutcome {
    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            AttemptOutcome::InvocationFailed(_) => "invocation_error",
            AttemptOutcome::ExtractionFailed(_) => "extraction_error",
            AttemptOutcome::ValidationFailed { .. } => "validation_error",
            AttemptOutcome::Accepted => "accepted",
        }
    }
}

/// One entry of the per-call attempt log.
///
/// Diagnostics only: surfaced through `classify_with_log`, tracing, and
/// metrics. The engine never persists it.
#[derive(Debug, Clone)]
pub struct ModelAttempt {
    pub model: String,
    /// True when this was the stricter-prompt repair attempt.
    pub repair: bool,
    pub outcome: AttemptOutcome,
}
