//! Classification orchestrator.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::decision::{validate, ConfidenceSource, Decision, Taxonomy, ValidatedDecision};
use crate::engine::fallback::RuleClassifier;
use crate::engine::prompt;
use crate::engine::types::{AttemptOutcome, ModelAttempt};
use crate::extract;
use crate::metrics;
use crate::model::{CompletionRequest, ModelInvoker, ModelSpec};
use crate::retrieval::ContextRetriever;
use crate::ticket::TicketInput;

/// Engine tuning knobs. The ordered model list drives the retry policy:
/// primary first, fallbacks after.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub models: Vec<ModelSpec>,
    /// Maximum tokens per completion.
    pub max_tokens: u32,
    /// Sampling temperature. Zero keeps classification deterministic.
    pub temperature: f32,
    /// Upper bound on concurrent classifications in `classify_batch`, so a
    /// serializing local inference runtime is not oversaturated.
    pub max_concurrency: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            max_tokens: 256,
            temperature: 0.0,
            max_concurrency: 4,
        }
    }
}

/// Outcome of a single attempt within the state machine.
enum AttemptResult {
    Accepted(ValidatedDecision),
    /// The model never answered; repairing the prompt cannot help.
    InvocationFailed,
    /// The model answered but the output was unusable; repair may help.
    BadOutput,
}

/// The classification orchestrator.
///
/// `classify` never fails outward: it walks the ordered model list, grants
/// each model one stricter-prompt repair attempt after unusable output, and
/// terminates in the deterministic rule fallback when the list is exhausted.
/// Calls share no mutable state, so any number may run concurrently.
pub struct TriageEngine {
    config: EngineConfig,
    invoker: ModelInvoker,
    taxonomy: Taxonomy,
    fallback: RuleClassifier,
    retriever: Option<Arc<dyn ContextRetriever>>,
}

impl TriageEngine {
    pub fn new(config: EngineConfig, invoker: ModelInvoker, taxonomy: Taxonomy) -> Self {
        let fallback = RuleClassifier::new(taxonomy.clone());
        Self {
            config,
            invoker,
            taxonomy,
            fallback,
            retriever: None,
        }
    }

    /// Set the optional retrieval collaborator.
    pub fn with_retriever(mut self, retriever: Arc<dyn ContextRetriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classify a ticket. Always returns a schema-valid decision.
    pub async fn classify(&self, ticket: &TicketInput) -> Decision {
        self.classify_with_log(ticket).await.0
    }

    /// Classify a ticket and return the per-model attempt log.
    pub async fn classify_with_log(&self, ticket: &TicketInput) -> (Decision, Vec<ModelAttempt>) {
        let start = Instant::now();
        let mut attempts: Vec<ModelAttempt> = Vec::new();

        let context = self.resolve_context(ticket).await;
        let system = prompt::system_prompt(&self.taxonomy);
        let user = prompt::user_prompt(ticket, context.as_deref());

        for spec in &self.config.models {
            if let Some(validated) = self.try_model(spec, &system, &user, &mut attempts).await {
                let decision = validated.into_decision(ConfidenceSource::Model(spec.name.clone()));
                info!(
                    ticket = %ticket.id,
                    model = %spec.name,
                    category = %decision.category,
                    "classification accepted"
                );
                observe(&spec.name, start);
                return (decision, attempts);
            }
        }

        let decision = self.fallback.classify(ticket);
        warn!(
            ticket = %ticket.id,
            category = %decision.category,
            attempts = attempts.len(),
            "no model produced a valid decision, using rule fallback"
        );
        observe(decision.confidence_source.as_str(), start);
        (decision, attempts)
    }

    /// Classify tickets concurrently, bounded by `max_concurrency`.
    /// Decisions are returned in input order.
    pub async fn classify_batch(&self, tickets: &[TicketInput]) -> Vec<Decision> {
        let limit = self.config.max_concurrency.max(1);
        let semaphore = Arc::new(Semaphore::new(limit));

        let classifications = tickets.iter().map(|ticket| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                // The semaphore is never closed, so acquisition cannot fail.
                let _permit = semaphore.acquire_owned().await.ok();
                self.classify(ticket).await
            }
        });

        futures::future::join_all(classifications).await
    }

    /// Run one model through invoke -> extract -> validate, with at most one
    /// stricter-prompt repair attempt.
    async fn try_model(
        &self,
        spec: &ModelSpec,
        system: &str,
        user: &str,
        attempts: &mut Vec<ModelAttempt>,
    ) -> Option<ValidatedDecision> {
        match self.attempt(spec, system, user, false, attempts).await {
            AttemptResult::Accepted(validated) => return Some(validated),
            AttemptResult::InvocationFailed => return None,
            AttemptResult::BadOutput => {}
        }

        metrics::REPAIR_ATTEMPTS.inc();
        let repaired = prompt::repair_prompt(user);
        match self.attempt(spec, system, &repaired, true, attempts).await {
            AttemptResult::Accepted(validated) => Some(validated),
            _ => None,
        }
    }

    async fn attempt(
        &self,
        spec: &ModelSpec,
        system: &str,
        user: &str,
        repair: bool,
        attempts: &mut Vec<ModelAttempt>,
    ) -> AttemptResult {
        let request = CompletionRequest::new(user)
            .with_system(system)
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.config.temperature);

        let raw = match self.invoker.invoke(spec, &request).await {
            Ok(raw) => raw,
            Err(error) => {
                warn!(model = %spec.name, repair, error = %error, "model invocation failed");
                record(attempts, spec, repair, AttemptOutcome::InvocationFailed(error));
                return AttemptResult::InvocationFailed;
            }
        };

        let candidate = match extract::extract(&raw) {
            Ok(candidate) => candidate,
            Err(error) => {
                debug!(model = %spec.name, repair, stage = %error.stage, "extraction failed");
                record(attempts, spec, repair, AttemptOutcome::ExtractionFailed(error));
                return AttemptResult::BadOutput;
            }
        };

        match validate(&candidate, &self.taxonomy) {
            Ok(validated) => {
                record(attempts, spec, repair, AttemptOutcome::Accepted);
                AttemptResult::Accepted(validated)
            }
            Err(error) => {
                debug!(model = %spec.name, repair, error = %error, "validation failed");
                record(attempts, spec, repair, AttemptOutcome::ValidationFailed { raw, error });
                AttemptResult::BadOutput
            }
        }
    }

    /// Context priority: caller-supplied, then the retriever. A retrieval
    /// failure or empty result degrades to classification without context.
    async fn resolve_context(&self, ticket: &TicketInput) -> Option<String> {
        if let Some(context) = &ticket.context {
            if !context.trim().is_empty() {
                return Some(context.clone());
            }
        }

        let retriever = self.retriever.as_ref()?;
        match retriever.retrieve(&ticket.text()).await {
            Ok(context) if !context.trim().is_empty() => Some(context),
            Ok(_) => {
                debug!(retriever = %retriever.name(), "retriever returned empty context");
                metrics::RETRIEVAL_FAILURES.inc();
                None
            }
            Err(error) => {
                warn!(
                    retriever = %retriever.name(),
                    error = %error,
                    "context retrieval failed, classifying without context"
                );
                metrics::RETRIEVAL_FAILURES.inc();
                None
            }
        }
    }
}

fn record(attempts: &mut Vec<ModelAttempt>, spec: &ModelSpec, repair: bool, outcome: AttemptOutcome) {
    metrics::MODEL_ATTEMPTS
        .with_label_values(&[spec.name.as_str(), outcome.label()])
        .inc();
    attempts.push(ModelAttempt {
        model: spec.name.clone(),
        repair,
        outcome,
    });
}

fn observe(source: &str, start: Instant) {
    metrics::CLASSIFICATIONS_TOTAL.with_label_values(&[source]).inc();
    metrics::CLASSIFICATION_DURATION
        .with_label_values(&[source])
        .observe(start.elapsed().as_secs_f64());
}
