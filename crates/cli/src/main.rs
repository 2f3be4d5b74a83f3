//! deskbrain - classify a support ticket from stdin.
//!
//! Usage: `deskbrain [ticket-id] [subject] < ticket.txt`
//!
//! Reads the ticket body from stdin, runs it through the triage engine
//! configured in `config.toml` (or `$DESKBRAIN_CONFIG`), and prints the
//! decision as JSON on stdout.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deskbrain_core::{
    load_config, validate_config, BackendProvider, CompletionBackend, ModelInvoker, OllamaBackend,
    TicketInput, TriageEngine,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine config path
    let config_path = std::env::var("DESKBRAIN_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!(
        "Configuration loaded: {} model(s), primary {:?}",
        config.models.len(),
        config.models.first().map(|m| m.name.as_str()).unwrap_or("none")
    );

    // Create completion backend
    let backend: Arc<dyn CompletionBackend> = match config.backend.provider {
        BackendProvider::Ollama => {
            let mut backend = OllamaBackend::new();
            if let Some(api_base) = &config.backend.api_base {
                backend = backend.with_api_base(api_base.clone());
            }
            Arc::new(backend)
        }
    };

    let engine = TriageEngine::new(
        config.engine_config(),
        ModelInvoker::new(backend),
        config.taxonomy.clone(),
    );

    // Assemble the ticket: id and subject from args, body from stdin
    let mut args = std::env::args().skip(1);
    let id = args.next().unwrap_or_else(|| "ticket-1".to_string());
    let subject = args.next().unwrap_or_default();

    let mut body = String::new();
    std::io::stdin()
        .read_to_string(&mut body)
        .context("Failed to read ticket body from stdin")?;

    let ticket = TicketInput::new(id, body).with_subject(subject);

    let (decision, attempts) = engine.classify_with_log(&ticket).await;
    info!(
        "Decision from {} after {} model attempt(s)",
        decision.confidence_source,
        attempts.len()
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&decision).context("Failed to encode decision")?
    );

    Ok(())
}
