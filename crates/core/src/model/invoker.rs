//! Single-model invocation with timeout enforcement.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::backend::{CompletionBackend, CompletionRequest, InvocationError};

/// One entry of the ordered model list: primary first, fallbacks after.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelSpec {
    /// Model identifier as known to the backend (e.g. "llama3.2:3b").
    pub name: String,
    /// Per-model invocation timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    45
}

impl ModelSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Invokes exactly one model per call.
///
/// Bounds the backend call with the model's configured timeout and rejects empty
/// completions. No retries happen here; retry and fallback sequencing live
/// in the orchestrator so extraction and validation outcomes can decide
/// whether to repair the same model or advance to the next.
pub struct ModelInvoker {
    backend: Arc<dyn CompletionBackend>,
}

impl ModelInvoker {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Invoke the model named by `spec` and return its raw completion.
    pub async fn invoke(
        &self,
        spec: &ModelSpec,
        request: &CompletionRequest,
    ) -> Result<String, InvocationError> {
        let completion =
            tokio::time::timeout(spec.timeout(), self.backend.complete(&spec.name, request))
                .await
                .map_err(|_| InvocationError::Timeout(spec.timeout()))??;

        if completion.trim().is_empty() {
            return Err(InvocationError::EmptyOutput);
        }

        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedBackend {
        completion: Mutex<Result<String, InvocationError>>,
        delay: Option<Duration>,
    }

    impl ScriptedBackend {
        fn returning(completion: Result<String, InvocationError>) -> Self {
            Self {
                completion: Mutex::new(completion),
                delay: None,
            }
        }

        fn slow(completion: &str, delay: Duration) -> Self {
            Self {
                completion: Mutex::new(Ok(completion.to_string())),
                delay: Some(delay),
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            _model: &str,
            _request: &CompletionRequest,
        ) -> Result<String, InvocationError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.completion.lock().unwrap().clone()
        }
    }

    #[tokio::test]
    async fn test_invoke_passes_through_completion() {
        let invoker = ModelInvoker::new(Arc::new(ScriptedBackend::returning(Ok(
            "{\"category\": \"billing\"}".to_string(),
        ))));

        let spec = ModelSpec::new("m1");
        let request = CompletionRequest::new("prompt");
        let text = invoker.invoke(&spec, &request).await.unwrap();
        assert_eq!(text, "{\"category\": \"billing\"}");
    }

    #[tokio::test]
    async fn test_invoke_maps_whitespace_to_empty_output() {
        let invoker = ModelInvoker::new(Arc::new(ScriptedBackend::returning(Ok(
            "  \n\t ".to_string()
        ))));

        let spec = ModelSpec::new("m1");
        let result = invoker.invoke(&spec, &CompletionRequest::new("prompt")).await;
        assert!(matches!(result, Err(InvocationError::EmptyOutput)));
    }

    #[tokio::test]
    async fn test_invoke_propagates_backend_error() {
        let invoker = ModelInvoker::new(Arc::new(ScriptedBackend::returning(Err(
            InvocationError::Unavailable("down".to_string()),
        ))));

        let spec = ModelSpec::new("m1");
        let result = invoker.invoke(&spec, &CompletionRequest::new("prompt")).await;
        assert!(matches!(result, Err(InvocationError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_invoke_times_out_slow_backend() {
        let invoker = ModelInvoker::new(Arc::new(ScriptedBackend::slow(
            "too late",
            Duration::from_secs(10),
        )));

        let spec = ModelSpec::new("m1").with_timeout_secs(0);
        let result = invoker.invoke(&spec, &CompletionRequest::new("prompt")).await;
        assert!(matches!(result, Err(InvocationError::Timeout(_))));
    }

    #[test]
    fn test_model_spec_defaults() {
        let spec = ModelSpec::new("llama3.2:3b");
        assert_eq!(spec.name, "llama3.2:3b");
        assert_eq!(spec.timeout(), Duration::from_secs(45));
    }

    #[test]
    fn test_model_spec_deserializes_with_default_timeout() {
        let spec: ModelSpec = toml::from_str(r#"name = "llama3.1:8b""#).unwrap();
        assert_eq!(spec.timeout_secs, 45);
    }
}
