//! Scripted context retriever.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::retrieval::{ContextRetriever, RetrievalError};

/// Context retriever that replays a configured outcome and records queries.
pub struct MockRetriever {
    outcome: Mutex<Result<String, RetrievalError>>,
    queries: Mutex<Vec<String>>,
}

impl MockRetriever {
    /// Starts with an empty (but successful) context.
    pub fn new() -> Self {
        Self {
            outcome: Mutex::new(Ok(String::new())),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Make every retrieval return `context`.
    pub fn set_context(&self, context: &str) {
        *self.outcome.lock().unwrap() = Ok(context.to_string());
    }

    /// Make every retrieval fail with `message`.
    pub fn set_error(&self, message: &str) {
        *self.outcome.lock().unwrap() = Err(RetrievalError(message.to_string()));
    }

    /// All ticket texts retrieval was asked about, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl Default for MockRetriever {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContextRetriever for MockRetriever {
    fn name(&self) -> &str {
        "mock"
    }

    async fn retrieve(&self, ticket_text: &str) -> Result<String, RetrievalError> {
        self.queries.lock().unwrap().push(ticket_text.to_string());
        self.outcome.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_context() {
        let retriever = MockRetriever::new();
        retriever.set_context("- example => BILLING");

        let context = retriever.retrieve("charged twice").await.unwrap();
        assert_eq!(context, "- example => BILLING");
        assert_eq!(retriever.queries(), vec!["charged twice"]);
    }

    #[tokio::test]
    async fn test_scripted_error() {
        let retriever = MockRetriever::new();
        retriever.set_error("index offline");

        let result = retriever.retrieve("anything").await;
        assert!(result.is_err());
    }
}
