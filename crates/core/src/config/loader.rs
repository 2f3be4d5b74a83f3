use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("DESKBRAIN_").split("_"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[[models]]
name = "llama3.2:3b"
timeout_secs = 30

[[models]]
name = "llama3.1:8b"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.models.len(), 2);
        assert_eq!(config.models[0].name, "llama3.2:3b");
        assert_eq!(config.models[0].timeout_secs, 30);
        assert_eq!(config.models[1].timeout_secs, 45);
        assert_eq!(config.backend.provider, BackendProvider::Ollama);
    }

    #[test]
    fn test_load_config_from_str_missing_models() {
        let toml = r#"
[backend]
provider = "ollama"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[backend]
api_base = "http://inference-host:11434"

[[models]]
name = "llama3.2:3b"

[engine]
max_tokens = 150
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.backend.api_base.as_deref(), Some("http://inference-host:11434"));
        assert_eq!(config.engine.max_tokens, 150);
        assert_eq!(config.taxonomy.default_category, "GENERAL");
    }

    #[test]
    fn test_load_config_with_custom_taxonomy() {
        let toml = r#"
[[models]]
name = "llama3.2:3b"

[taxonomy]
categories = ["BILLING", "GENERAL"]

[[taxonomy.rules]]
category = "BILLING"
keywords = ["refund", "charge"]
subcategory = "payment_issue"
response = "Let me check this for you."
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.taxonomy.categories, vec!["BILLING", "GENERAL"]);
        assert_eq!(config.taxonomy.rules.len(), 1);
    }
}
