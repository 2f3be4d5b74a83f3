use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate semantic constraints the type system cannot express.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.models.is_empty() {
        return Err(invalid("at least one model must be configured"));
    }

    let mut seen = HashSet::new();
    for spec in &config.models {
        if spec.name.trim().is_empty() {
            return Err(invalid("model name cannot be empty"));
        }
        if spec.timeout_secs == 0 {
            return Err(invalid(&format!(
                "model {:?} timeout must be positive",
                spec.name
            )));
        }
        if !seen.insert(spec.name.as_str()) {
            return Err(invalid(&format!("duplicate model {:?}", spec.name)));
        }
    }

    if config.engine.max_tokens == 0 {
        return Err(invalid("engine.max_tokens must be positive"));
    }
    if config.engine.max_concurrency == 0 {
        return Err(invalid("engine.max_concurrency must be positive"));
    }
    if !(0.0..=2.0).contains(&config.engine.temperature) {
        return Err(invalid(&format!(
            "engine.temperature must be between 0.0 and 2.0, got {}",
            config.engine.temperature
        )));
    }

    config.taxonomy.validate().map_err(ConfigError::ValidationError)?;

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
