//! Scripted completion backend.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::model::{CompletionBackend, CompletionRequest, InvocationError};

/// One recorded backend call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub prompt: String,
    pub system: Option<String>,
}

/// Completion backend that replays scripted outcomes per model.
///
/// Each model name holds a queue of outcomes; every `complete` call pops
/// the front. A model with no remaining script reports itself unavailable,
/// which is also what unscripted models do.
pub struct MockBackend {
    scripts: Mutex<HashMap<String, VecDeque<Result<String, InvocationError>>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful completion for `model`.
    pub fn push_completion(&self, model: &str, text: &str) {
        self.scripts
            .lock()
            .unwrap()
            .entry(model.to_string())
            .or_default()
            .push_back(Ok(text.to_string()));
    }

    /// Queue a failed invocation for `model`.
    pub fn push_error(&self, model: &str, error: InvocationError) {
        self.scripts
            .lock()
            .unwrap()
            .entry(model.to_string())
            .or_default()
            .push_back(Err(error));
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls made to `model`.
    pub fn call_count(&self, model: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.model == model)
            .count()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        model: &str,
        request: &CompletionRequest,
    ) -> Result<String, InvocationError> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: model.to_string(),
            prompt: request.prompt.clone(),
            system: request.system.clone(),
        });

        self.scripts
            .lock()
            .unwrap()
            .get_mut(model)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Err(InvocationError::Unavailable("no scripted response".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_responses_pop_in_order() {
        let backend = MockBackend::new();
        backend.push_completion("m1", "first");
        backend.push_completion("m1", "second");

        let request = CompletionRequest::new("prompt");
        assert_eq!(backend.complete("m1", &request).await.unwrap(), "first");
        assert_eq!(backend.complete("m1", &request).await.unwrap(), "second");
        assert!(backend.complete("m1", &request).await.is_err());
    }

    #[tokio::test]
    async fn test_unscripted_model_is_unavailable() {
        let backend = MockBackend::new();
        let result = backend.complete("ghost", &CompletionRequest::new("p")).await;
        assert!(matches!(result, Err(InvocationError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_calls_are_recorded() {
        let backend = MockBackend::new();
        backend.push_completion("m1", "ok");

        let request = CompletionRequest::new("user prompt").with_system("system prompt");
        backend.complete("m1", &request).await.unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "m1");
        assert_eq!(calls[0].prompt, "user prompt");
        assert_eq!(calls[0].system.as_deref(), Some("system prompt"));
        assert_eq!(backend.call_count("m1"), 1);
        assert_eq!(backend.call_count("m2"), 0);
    }
}
