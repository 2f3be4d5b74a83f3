//! Ollama backend for local inference.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::backend::{CompletionBackend, CompletionRequest, InvocationError};

/// Client for a local Ollama server.
///
/// Connects to http://localhost:11434 by default; no API key required. The
/// model is chosen per call, so one client serves the whole ordered model
/// list.
pub struct OllamaBackend {
    client: reqwest::Client,
    api_base: String,
}

impl OllamaBackend {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: "http://localhost:11434".to_string(),
        }
    }

    /// Set a custom API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

impl Default for OllamaBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    // Ollama needs an explicit 0 for deterministic output
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct GenerateErrorResponse {
    error: String,
}

#[async_trait]
impl CompletionBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(
        &self,
        model: &str,
        request: &CompletionRequest,
    ) -> Result<String, InvocationError> {
        let body = GenerateRequest {
            model,
            prompt: &request.prompt,
            system: request.system.as_deref(),
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.api_base))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| InvocationError::Unavailable(e.to_string()))?;

        let status = response.status().as_u16();

        if status != 200 {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GenerateErrorResponse>(&error_text)
                .map(|e| e.error)
                .unwrap_or(error_text);
            return Err(InvocationError::Unavailable(format!(
                "status {}: {}",
                status, message
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InvocationError::Unavailable(e.to_string()))?;

        Ok(parsed.response)
    }
}
