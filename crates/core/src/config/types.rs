use serde::{Deserialize, Serialize};

use crate::decision::Taxonomy;
use crate::engine::EngineConfig;
use crate::model::ModelSpec;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    /// Ordered model list: primary first, fallbacks after.
    pub models: Vec<ModelSpec>,
    #[serde(default)]
    pub engine: EngineSettings,
    /// Category set and fallback rules. Defaults to the built-in taxonomy.
    #[serde(default)]
    pub taxonomy: Taxonomy,
}

impl Config {
    /// Assemble the engine configuration from the loaded settings.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            models: self.models.clone(),
            max_tokens: self.engine.max_tokens,
            temperature: self.engine.temperature,
            max_concurrency: self.engine.max_concurrency,
        }
    }
}

/// Completion backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Backend type
    #[serde(default)]
    pub provider: BackendProvider,
    /// Override for the inference server URL (e.g. "http://localhost:11434")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: BackendProvider::default(),
            api_base: None,
        }
    }
}

/// Available completion backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackendProvider {
    #[default]
    Ollama,
    // Future: OpenAiCompatible
}

/// Engine tuning settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineSettings {
    /// Maximum tokens per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature (0.0 = deterministic).
    #[serde(default)]
    pub temperature: f32,
    /// Upper bound on concurrent classifications.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            max_concurrency: default_max_concurrency(),
        }
    }
}

fn default_max_tokens() -> u32 {
    256
}

fn default_max_concurrency() -> usize {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_settings_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.max_tokens, 256);
        assert_eq!(settings.temperature, 0.0);
        assert_eq!(settings.max_concurrency, 4);
    }

    #[test]
    fn test_engine_config_assembly() {
        let config = Config {
            backend: BackendConfig::default(),
            models: vec![ModelSpec::new("llama3.2:3b"), ModelSpec::new("llama3.1:8b")],
            engine: EngineSettings {
                max_tokens: 150,
                temperature: 0.1,
                max_concurrency: 2,
            },
            taxonomy: Taxonomy::default(),
        };

        let engine = config.engine_config();
        assert_eq!(engine.models.len(), 2);
        assert_eq!(engine.models[0].name, "llama3.2:3b");
        assert_eq!(engine.max_tokens, 150);
        assert_eq!(engine.max_concurrency, 2);
    }
}
