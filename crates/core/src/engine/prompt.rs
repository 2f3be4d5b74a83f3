//! Prompt construction for the classification call.

use crate::decision::Taxonomy;
use crate::ticket::TicketInput;

/// Appended to the user prompt for the single per-model repair attempt.
pub const REPAIR_INSTRUCTION: &str = "Your previous reply could not be parsed. Return ONLY the \
JSON object, with double-quoted keys and strings, and no other text.";

/// Build the system prompt: classifier instructions plus the category set
/// and the required JSON shape.
pub fn system_prompt(taxonomy: &Taxonomy) -> String {
    format!(
        r#"You are an expert helpdesk classifier.
Return ONLY a JSON object with exactly these fields:
{{
  "category": "{}",
  "subcategory": "specific_issue_type",
  "summary": "short summary of the ticket",
  "response": "helpful short reply to the customer"
}}"#,
        taxonomy.categories.join("|")
    )
}

/// Build the user prompt from the ticket and optional retrieved context.
pub fn user_prompt(ticket: &TicketInput, context: Option<&str>) -> String {
    let mut prompt = String::new();

    if let Some(context) = context {
        let context = context.trim();
        if !context.is_empty() {
            prompt.push_str("Use these examples as context:\n");
            prompt.push_str(context);
            prompt.push_str("\n\n");
        }
    }

    if let Some(conversation) = ticket.conversation.as_deref() {
        let conversation = conversation.trim();
        if !conversation.is_empty() {
            prompt.push_str("Prior conversation:\n");
            prompt.push_str(conversation);
            prompt.push_str("\n\n");
        }
    }

    let subject = ticket.subject.trim();
    if !subject.is_empty() {
        prompt.push_str("Subject: ");
        prompt.push_str(subject);
        prompt.push('\n');
    }

    prompt.push_str(&format!("Ticket: \"{}\"", ticket.body.trim()));
    prompt
}

/// The user prompt with the stricter JSON-only instruction appended.
pub fn repair_prompt(base: &str) -> String {
    format!("{}\n\n{}", base, REPAIR_INSTRUCTION)
}
