//! deskbrain-core - support ticket triage engine.
//!
//! Turns free-text tickets into validated triage decisions. A configured
//! list of language models is tried in order; each raw completion goes
//! through staged extraction and schema validation, with one stricter-prompt
//! repair attempt per model. When no model produces a valid decision, a
//! deterministic keyword fallback does, so `classify` never fails outward.

pub mod config;
pub mod decision;
pub mod engine;
pub mod extract;
pub mod metrics;
pub mod model;
pub mod retrieval;
pub mod testing;
pub mod ticket;

pub use config::{
    load_config, load_config_from_str, validate_config, BackendConfig, BackendProvider, Config,
    ConfigError, EngineSettings,
};
pub use decision::{
    CategoryRule, ConfidenceSource, Decision, FieldFailure, Taxonomy, ValidatedDecision,
    ValidationError,
};
pub use engine::{AttemptOutcome, EngineConfig, ModelAttempt, RuleClassifier, TriageEngine};
pub use extract::{extract, ExtractionError, ExtractionStage};
pub use model::{
    CompletionBackend, CompletionRequest, InvocationError, ModelInvoker, ModelSpec, OllamaBackend,
};
pub use retrieval::{ContextRetriever, RetrievalError};
pub use ticket::TicketInput;
