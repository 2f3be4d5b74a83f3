//! The decision contract shared with downstream consumers.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Tag used for decisions produced by the rule fallback.
pub const RULE_FALLBACK_TAG: &str = "rule_fallback";

/// Where a decision came from: the accepting model, or the rule fallback.
///
/// Serialized as a plain string (the model name, or `"rule_fallback"`) so
/// the downstream contract stays a flat object of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfidenceSource {
    /// A model produced the decision; carries the model name.
    Model(String),
    /// The deterministic keyword rules produced the decision.
    RuleFallback,
}

impl ConfidenceSource {
    pub fn as_str(&self) -> &str {
        match self {
            ConfidenceSource::Model(name) => name,
            ConfidenceSource::RuleFallback => RULE_FALLBACK_TAG,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ConfidenceSource::RuleFallback)
    }

    fn from_tag(tag: String) -> Self {
        if tag == RULE_FALLBACK_TAG {
            ConfidenceSource::RuleFallback
        } else {
            ConfidenceSource::Model(tag)
        }
    }
}

impl fmt::Display for ConfidenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ConfidenceSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConfidenceSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(ConfidenceSource::from_tag(String::deserialize(deserializer)?))
    }
}

/// A validated triage decision.
///
/// Every instance handed to a caller is schema-valid: `category` is a
/// canonical member of the configured taxonomy and the three text fields are
/// non-empty. Field names and the category set are a stable contract for the
/// ticket connector, persistence, and dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Decision {
    /// Canonical upper-case category.
    pub category: String,
    /// Short issue identifier, lower-case with underscores.
    pub subcategory: String,
    /// Short natural-language summary of the ticket.
    pub summary: String,
    /// Suggested reply for the end customer.
    pub response: String,
    /// The model that produced the decision, or `"rule_fallback"`.
    pub confidence_source: ConfidenceSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(source: ConfidenceSource) -> Decision {
        Decision {
            category: "BILLING".to_string(),
            subcategory: "refund_issue".to_string(),
            summary: "Duplicate charge".to_string(),
            response: "We will refund you.".to_string(),
            confidence_source: source,
        }
    }

    #[test]
    fn test_model_source_serializes_as_model_name() {
        let json =
            serde_json::to_string(&decision(ConfidenceSource::Model("llama3.2:3b".into()))).unwrap();
        assert!(json.contains(r#""confidence_source":"llama3.2:3b""#));
    }

    #[test]
    fn test_fallback_source_serializes_as_tag() {
        let json = serde_json::to_string(&decision(ConfidenceSource::RuleFallback)).unwrap();
        assert!(json.contains(r#""confidence_source":"rule_fallback""#));
    }

    #[test]
    fn test_source_round_trip() {
        for source in [
            ConfidenceSource::Model("llama3.1:8b".into()),
            ConfidenceSource::RuleFallback,
        ] {
            let json = serde_json::to_string(&decision(source.clone())).unwrap();
            let parsed: Decision = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed.confidence_source, source);
        }
    }

    #[test]
    fn test_is_fallback() {
        assert!(ConfidenceSource::RuleFallback.is_fallback());
        assert!(!ConfidenceSource::Model("m".into()).is_fallback());
    }
}
