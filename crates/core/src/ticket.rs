//! Ticket input types.

use serde::{Deserialize, Serialize};

/// A support ticket as submitted for classification.
///
/// Created by the ticket-source connector; the engine never mutates it and
/// keeps no copy of it after the classification call returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketInput {
    /// Caller-supplied ticket identifier.
    pub id: String,
    /// Subject line. May be empty.
    #[serde(default)]
    pub subject: String,
    /// Free-text ticket body. May be empty.
    #[serde(default)]
    pub body: String,
    /// Prior conversation with the customer, oldest message first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<String>,
    /// Retrieved context supplied by the caller. When absent and a
    /// retriever is configured, the engine fetches context itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl TicketInput {
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject: String::new(),
            body: body.into(),
            conversation: None,
            context: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_conversation(mut self, conversation: impl Into<String>) -> Self {
        self.conversation = Some(conversation.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Subject and body joined, for keyword scanning and retrieval queries.
    pub fn text(&self) -> String {
        match (self.subject.trim(), self.body.trim()) {
            ("", body) => body.to_string(),
            (subject, "") => subject.to_string(),
            (subject, body) => format!("{} {}", subject, body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let ticket = TicketInput::new("t-1", "My order never arrived")
            .with_subject("Missing package")
            .with_conversation("Customer: hello")
            .with_context("- similar ticket => SHIPPING");

        assert_eq!(ticket.id, "t-1");
        assert_eq!(ticket.subject, "Missing package");
        assert_eq!(ticket.body, "My order never arrived");
        assert_eq!(ticket.conversation.as_deref(), Some("Customer: hello"));
        assert!(ticket.context.is_some());
    }

    #[test]
    fn test_text_joins_subject_and_body() {
        let ticket = TicketInput::new("t-1", "body text").with_subject("subject line");
        assert_eq!(ticket.text(), "subject line body text");
    }

    #[test]
    fn test_text_without_subject() {
        let ticket = TicketInput::new("t-1", "  body only  ");
        assert_eq!(ticket.text(), "body only");
    }

    #[test]
    fn test_text_empty_ticket() {
        let ticket = TicketInput::new("t-1", "");
        assert_eq!(ticket.text(), "");
    }

    #[test]
    fn test_serialization_skips_absent_optionals() {
        let ticket = TicketInput::new("t-1", "body");
        let json = serde_json::to_string(&ticket).unwrap();
        assert!(!json.contains("conversation"));
        assert!(!json.contains("context"));

        let parsed: TicketInput = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ticket);
    }
}
