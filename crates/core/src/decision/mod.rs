//! Decision schema: the output contract, the category taxonomy, and the
//! candidate validator.

mod taxonomy;
mod types;
mod validate;

pub use taxonomy::{CategoryRule, Taxonomy};
pub use types::{ConfidenceSource, Decision, RULE_FALLBACK_TAG};
pub use validate::{validate, FieldFailure, ValidatedDecision, ValidationError, REQUIRED_FIELDS};
