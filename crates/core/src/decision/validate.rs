//! Candidate validation against the decision schema.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use super::taxonomy::Taxonomy;
use super::types::{ConfidenceSource, Decision};

/// The four keys a candidate mapping must carry. Extra keys are ignored.
pub const REQUIRED_FIELDS: [&str; 4] = ["category", "subcategory", "summary", "response"];

/// One violated constraint on a candidate field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFailure {
    /// The key is absent.
    Missing { field: &'static str },
    /// The value is not a string.
    WrongType { field: &'static str },
    /// The value is empty after trimming.
    Empty { field: &'static str },
    /// The category is not in the configured set.
    InvalidCategory { value: String },
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldFailure::Missing { field } => write!(f, "missing field {}", field),
            FieldFailure::WrongType { field } => write!(f, "field {} is not a string", field),
            FieldFailure::Empty { field } => write!(f, "field {} is empty", field),
            FieldFailure::InvalidCategory { value } => write!(f, "unknown category {:?}", value),
        }
    }
}

/// Validation failure listing every violated field, so the orchestrator can
/// log complete diagnostics without re-deriving them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid decision candidate: {}", format_failures(.failures))]
pub struct ValidationError {
    pub failures: Vec<FieldFailure>,
}

fn format_failures(failures: &[FieldFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// The four normalized fields of an accepted candidate. Becomes a
/// [`Decision`] once the orchestrator attaches the confidence source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDecision {
    pub category: String,
    pub subcategory: String,
    pub summary: String,
    pub response: String,
}

impl ValidatedDecision {
    pub fn into_decision(self, source: ConfidenceSource) -> Decision {
        Decision {
            category: self.category,
            subcategory: self.subcategory,
            summary: self.summary,
            response: self.response,
            confidence_source: source,
        }
    }
}

/// Check a candidate mapping against the decision schema.
///
/// Pure function: either every required field is present, string-typed, and
/// non-empty (with `category` canonicalized against the taxonomy and
/// `subcategory` normalized to lower_snake_case), or the error lists every
/// violated field.
pub fn validate(
    candidate: &Map<String, Value>,
    taxonomy: &Taxonomy,
) -> Result<ValidatedDecision, ValidationError> {
    let mut failures = Vec::new();

    let category = require_string(candidate, "category", &mut failures).and_then(|raw| {
        match taxonomy.canonicalize(&raw) {
            Some(canonical) => Some(canonical.to_string()),
            None => {
                failures.push(FieldFailure::InvalidCategory { value: raw });
                None
            }
        }
    });
    let subcategory =
        require_string(candidate, "subcategory", &mut failures).map(normalize_subcategory);
    let summary = require_string(candidate, "summary", &mut failures);
    let response = require_string(candidate, "response", &mut failures);

    match (category, subcategory, summary, response) {
        (Some(category), Some(subcategory), Some(summary), Some(response)) => Ok(ValidatedDecision {
            category,
            subcategory,
            summary,
            response,
        }),
        _ => Err(ValidationError { failures }),
    }
}

fn require_string(
    candidate: &Map<String, Value>,
    field: &'static str,
    failures: &mut Vec<FieldFailure>,
) -> Option<String> {
    match candidate.get(field) {
        None => {
            failures.push(FieldFailure::Missing { field });
            None
        }
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                failures.push(FieldFailure::Empty { field });
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(_) => {
            failures.push(FieldFailure::WrongType { field });
            None
        }
    }
}

fn normalize_subcategory(raw: String) -> String {
    raw.to_lowercase().split_whitespace().collect::<Vec<_>>().join("_")
}
