//! Classification engine: prompt construction, the model-attempt state
//! machine, and the deterministic rule fallback.
//!
//! The flow per ticket, over the ordered model list `[m1, m2, ...]`:
//!
//! ```text
//! TryModel(i) --invoke ok--> TryExtract(i) --ok--> TryValidate(i) --ok--> Accepted
//!     |                          |                      |
//!     | invoke error             | extract error        | validation error
//!     v                          v                      v
//! TryModel(i+1)            one repair attempt on m_i, then TryModel(i+1)
//!     |
//!     | list exhausted
//!     v
//! Fallback (deterministic keyword rules, cannot fail)
//! ```
//!
//! At most two invocations per model, so a classification terminates within
//! `2 * n` attempts.

mod classifier;
mod fallback;
mod prompt;
mod types;

pub use classifier::{EngineConfig, TriageEngine};
pub use fallback::RuleClassifier;
pub use prompt::{repair_prompt, system_prompt, user_prompt, REPAIR_INSTRUCTION};
pub use types::{AttemptOutcome, ModelAttempt};
