//! Category taxonomy and fallback keyword rules.
//!
//! The category set and the deterministic fallback rules are configuration
//! data rather than code, so a deployment can tune them without touching the
//! state machine. The built-in default covers a typical e-commerce helpdesk.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One fallback rule: keywords mapped to a category and a canned reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRule {
    /// Category assigned when any keyword matches. Must be a member of the
    /// taxonomy's category set.
    pub category: String,
    /// Lower-case keywords checked against the ticket text.
    pub keywords: Vec<String>,
    /// Subcategory assigned by the rule fallback.
    pub subcategory: String,
    /// Customer-facing reply used by the rule fallback.
    pub response: String,
}

/// The configured category set plus the ordered fallback rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Taxonomy {
    /// Canonical category names, upper-case.
    pub categories: Vec<String>,
    /// Category used when no rule matches.
    #[serde(default = "default_category")]
    pub default_category: String,
    /// Subcategory used when no rule matches.
    #[serde(default = "default_subcategory")]
    pub default_subcategory: String,
    /// Reply used when no rule matches.
    #[serde(default = "default_response")]
    pub default_response: String,
    /// Ordered keyword rules; the first match wins.
    #[serde(default)]
    pub rules: Vec<CategoryRule>,
}

fn default_category() -> String {
    "GENERAL".to_string()
}

fn default_subcategory() -> String {
    "general".to_string()
}

fn default_response() -> String {
    "Thank you for your message. We'll assist you shortly.".to_string()
}

fn rule(category: &str, keywords: &[&str], subcategory: &str, response: &str) -> CategoryRule {
    CategoryRule {
        category: category.to_string(),
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
        subcategory: subcategory.to_string(),
        response: response.to_string(),
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            categories: ["ACCOUNT", "BILLING", "SHIPPING", "SUBSCRIPTION", "TECHNICAL", "GENERAL"]
                .into_iter()
                .map(String::from)
                .collect(),
            default_category: default_category(),
            default_subcategory: default_subcategory(),
            default_response: default_response(),
            rules: vec![
                rule(
                    "SHIPPING",
                    &["order", "delivery", "shipping", "package", "track", "arrive", "damaged"],
                    "delivery_issue",
                    "I see you have an order-related concern. Let me look into this for you.",
                ),
                rule(
                    "BILLING",
                    &["charge", "payment", "bill", "refund", "price", "invoice", "money", "fee"],
                    "payment_issue",
                    "I understand your billing concern. Let me check this for you.",
                ),
                rule(
                    "SUBSCRIPTION",
                    &["subscription", "cancel", "renew", "membership", "plan"],
                    "plan_change",
                    "I can help with your subscription question.",
                ),
                rule(
                    "TECHNICAL",
                    &["crash", "error", "technical", "bug", "slow", "website", "app", "loading"],
                    "product_malfunction",
                    "I understand you're experiencing technical difficulties.",
                ),
                rule(
                    "ACCOUNT",
                    &["login", "password", "account", "email", "username", "locked", "sign in"],
                    "access_issue",
                    "I understand you're having account issues. Let me help you resolve this.",
                ),
            ],
        }
    }
}

impl Taxonomy {
    /// Match `raw` against the category set, case-insensitively, returning
    /// the canonical upper-case form.
    pub fn canonicalize(&self, raw: &str) -> Option<&str> {
        let trimmed = raw.trim();
        self.categories
            .iter()
            .find(|c| c.eq_ignore_ascii_case(trimmed))
            .map(|c| c.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.canonicalize(name).is_some()
    }

    /// Validate structural constraints.
    pub fn validate(&self) -> Result<(), String> {
        if self.categories.is_empty() {
            return Err("taxonomy must define at least one category".to_string());
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.trim().is_empty() {
                return Err("category names cannot be empty".to_string());
            }
            if *category != category.to_uppercase() {
                return Err(format!("category {:?} must be canonical upper-case", category));
            }
            if !seen.insert(category.as_str()) {
                return Err(format!("duplicate category {:?}", category));
            }
        }

        if !self.contains(&self.default_category) {
            return Err(format!(
                "default category {:?} is not in the category set",
                self.default_category
            ));
        }
        if self.default_subcategory.trim().is_empty() {
            return Err("default subcategory cannot be empty".to_string());
        }
        if self.default_response.trim().is_empty() {
            return Err("default response cannot be empty".to_string());
        }

        for rule in &self.rules {
            if !self.contains(&rule.category) {
                return Err(format!(
                    "rule category {:?} is not in the category set",
                    rule.category
                ));
            }
            if rule.keywords.is_empty() {
                return Err(format!("rule for {:?} has no keywords", rule.category));
            }
            for keyword in &rule.keywords {
                if keyword.trim().is_empty() {
                    return Err(format!("rule for {:?} has an empty keyword", rule.category));
                }
                if *keyword != keyword.to_lowercase() {
                    return Err(format!(
                        "keyword {:?} for {:?} must be lower-case",
                        keyword, rule.category
                    ));
                }
            }
            if rule.subcategory.trim().is_empty() {
                return Err(format!("rule for {:?} has an empty subcategory", rule.category));
            }
            if rule.response.trim().is_empty() {
                return Err(format!("rule for {:?} has an empty response", rule.category));
            }
        }

        Ok(())
    }
}
