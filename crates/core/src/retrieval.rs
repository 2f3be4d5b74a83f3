//! Retrieval collaborator boundary.

use async_trait::async_trait;
use thiserror::Error;

/// A context lookup failed. The engine recovers by classifying without
/// context, so this never reaches classify callers.
#[derive(Debug, Clone, Error)]
#[error("context retrieval failed: {0}")]
pub struct RetrievalError(pub String);

/// Supplies contextual passages for a ticket.
///
/// Injected as an optional dependency; the engine appends whatever text the
/// retriever returns to the prompt and implements no retrieval or indexing
/// itself. A failure or empty result must not fail classification.
#[async_trait]
pub trait ContextRetriever: Send + Sync {
    /// Retriever name for logging.
    fn name(&self) -> &str;

    /// Return context text for the given ticket text.
    async fn retrieve(&self, ticket_text: &str) -> Result<String, RetrievalError>;
}
