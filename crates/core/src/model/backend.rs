//! Completion backend abstraction.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for a single model invocation.
#[derive(Debug, Clone, Error)]
pub enum InvocationError {
    /// The model or inference service is unreachable, or the request was
    /// rejected.
    #[error("model unavailable: {0}")]
    Unavailable(String),

    /// The invocation exceeded its configured timeout.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The model returned a zero-length or whitespace-only completion.
    #[error("empty completion")]
    EmptyOutput,
}

/// Request for a completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt (instructions for the model)
    pub system: Option<String>,
    /// User message
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Temperature (0.0 = deterministic)
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            max_tokens: 256,
            temperature: 0.0, // Deterministic by default for classification
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Request/response text-completion interface.
///
/// Swappable between a local inference runtime and a remote API, as long as
/// the implementation returns plain text. Implementations must not retry;
/// retry and fallback sequencing belong to the orchestrator so extraction
/// and validation outcomes can steer them.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Backend name for logging (e.g. "ollama").
    fn name(&self) -> &str;

    /// Send `request` to `model` and return the raw text completion.
    async fn complete(
        &self,
        model: &str,
        request: &CompletionRequest,
    ) -> Result<String, InvocationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_request_builder() {
        let request = CompletionRequest::new("Classify this")
            .with_system("You are a classifier")
            .with_max_tokens(150)
            .with_temperature(0.1);

        assert_eq!(request.prompt, "Classify this");
        assert_eq!(request.system, Some("You are a classifier".to_string()));
        assert_eq!(request.max_tokens, 150);
        assert_eq!(request.temperature, 0.1);
    }

    #[test]
    fn test_error_display() {
        let err = InvocationError::Unavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "model unavailable: connection refused");

        let err = InvocationError::EmptyOutput;
        assert_eq!(err.to_string(), "empty completion");
    }
}
