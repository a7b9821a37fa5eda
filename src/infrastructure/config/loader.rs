use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::domain::models::prompt::{CONTENT_PLACEHOLDER, QUESTION_PLACEHOLDER};

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error("Invalid prompt budget: {0}. Must be at least 1")]
    InvalidBudget(usize),

    #[error("Invalid temperature: {0}. Must be between 0.0 and 2.0")]
    InvalidTemperature(f32),

    #[error("Invalid embedding_dimension: {0}. Must be at least 1")]
    InvalidDimension(usize),

    #[error("Invalid max_concurrency: {0}. Must be at least 1")]
    InvalidConcurrency(usize),

    #[error("Invalid batch_threshold: {0}. Must be at least 1")]
    InvalidBatchThreshold(usize),

    #[error("Invalid rate limit: {0}. Must be positive")]
    InvalidRateLimit(f64),

    #[error("Invalid burst_size: {0}. Must be at least 1")]
    InvalidBurstSize(u32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("{0} cannot be empty")]
    EmptyModelName(&'static str),

    #[error("Prompt {field} must contain the {placeholder} placeholder")]
    MissingPlaceholder {
        field: &'static str,
        placeholder: &'static str,
    },
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .qarag/config.yaml
    /// 3. .qarag/local.yaml (optional overrides)
    /// 4. Environment variables (QARAG_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("QARAG_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".qarag/config.yaml"))
            .merge(Yaml::file(".qarag/local.yaml"))
            .merge(Env::prefixed("QARAG_").split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let provider = &config.provider;
        if provider.model_name.trim().is_empty() {
            return Err(ConfigError::EmptyModelName("provider.model_name"));
        }
        if provider.embedding_model.trim().is_empty() {
            return Err(ConfigError::EmptyModelName("provider.embedding_model"));
        }
        if provider.embedding_dimension == 0 {
            return Err(ConfigError::InvalidDimension(provider.embedding_dimension));
        }
        if !(0.0..=2.0).contains(&provider.temperature) {
            return Err(ConfigError::InvalidTemperature(provider.temperature));
        }

        if config.embedding.batch_threshold == 0 {
            return Err(ConfigError::InvalidBatchThreshold(
                config.embedding.batch_threshold,
            ));
        }
        if config.embedding.max_concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(
                config.embedding.max_concurrency,
            ));
        }

        if config.retrieval.top_k == 0 {
            return Err(ConfigError::InvalidTopK(config.retrieval.top_k));
        }

        if config.prompt.budget == 0 {
            return Err(ConfigError::InvalidBudget(config.prompt.budget));
        }
        let template = &config.prompt.template;
        if !template.footer.contains(QUESTION_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder {
                field: "footer",
                placeholder: QUESTION_PLACEHOLDER,
            });
        }
        if !template.context_block.contains(CONTENT_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder {
                field: "context_block",
                placeholder: CONTENT_PLACEHOLDER,
            });
        }

        let rps = config.rate_limit.requests_per_second;
        if rps.is_nan() || rps <= 0.0 {
            return Err(ConfigError::InvalidRateLimit(
                config.rate_limit.requests_per_second,
            ));
        }
        if config.rate_limit.burst_size == 0 {
            return Err(ConfigError::InvalidBurstSize(config.rate_limit.burst_size));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::{LogFormat, ProviderKind};
    use crate::domain::models::prompt::BudgetUnit;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.provider.model_name, "gemini-1.5-flash");
        assert_eq!(config.provider.embedding_model, "models/embedding-001");
        assert!((config.provider.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.logging.level, "warn");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
provider:
  kind: openai
  embedding_model: text-embedding-3-small
  embedding_dimension: 1536
retrieval:
  top_k: 5
prompt:
  budget: 2000
  budget_unit: tokens
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.provider.kind, ProviderKind::OpenAi);
        assert_eq!(config.provider.embedding_dimension, 1536);
        assert_eq!(config.provider.model_name, "gemini-1.5-flash");
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.prompt.budget, 2000);
        assert_eq!(config.prompt.budget_unit, BudgetUnit::Tokens);
        assert_eq!(config.logging.format, LogFormat::Json);

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_zero_top_k() {
        let mut config = Config::default();
        config.retrieval.top_k = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTopK(0))
        ));
    }

    #[test]
    fn test_validate_zero_budget() {
        let mut config = Config::default();
        config.prompt.budget = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBudget(0))
        ));
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut config = Config::default();
        config.provider.temperature = 2.5;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTemperature(_))
        ));

        config.provider.temperature = 0.0;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_dimension() {
        let mut config = Config::default();
        config.provider.embedding_dimension = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidDimension(0))
        ));
    }

    #[test]
    fn test_validate_embedding_orchestration() {
        let mut config = Config::default();
        config.embedding.max_concurrency = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidConcurrency(0))
        ));

        let mut config = Config::default();
        config.embedding.batch_threshold = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBatchThreshold(0))
        ));
    }

    #[test]
    fn test_validate_empty_model_name() {
        let mut config = Config::default();
        config.provider.model_name = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyModelName("provider.model_name"))
        ));
    }

    #[test]
    fn test_validate_template_placeholders() {
        let mut config = Config::default();
        config.prompt.template.footer = "Respuesta:".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::MissingPlaceholder { field: "footer", .. })
        ));

        let mut config = Config::default();
        config.prompt.template.context_block = "- {rank}\n".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::MissingPlaceholder {
                field: "context_block",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rate_limit() {
        let mut config = Config::default();
        config.rate_limit.requests_per_second = -5.0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRateLimit(_))
        ));

        let mut config = Config::default();
        config.rate_limit.burst_size = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBurstSize(0))
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();

        match ConfigLoader::validate(&config) {
            Err(ConfigError::InvalidLogLevel(level)) => assert_eq!(level, "verbose"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_file_with_env_override() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "retrieval:\n  top_k: 4\nprovider:\n  temperature: 0.2\nlogging:\n  level: info"
        )
        .unwrap();
        file.flush().unwrap();

        temp_env::with_vars(
            [
                ("QARAG_RETRIEVAL__TOP_K", Some("7")),
                ("QARAG_LOGGING__LEVEL", None::<&str>),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.retrieval.top_k, 7, "env should win over file");
                assert!((config.provider.temperature - 0.2).abs() < f32::EPSILON);
                assert_eq!(config.logging.level, "info");
            },
        );
    }

    #[test]
    fn test_load_from_file_rejects_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "retrieval:\n  top_k: 0").unwrap();
        file.flush().unwrap();

        temp_env::with_var_unset("QARAG_RETRIEVAL__TOP_K", || {
            let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
            assert!(err.downcast_ref::<ConfigError>().is_some());
        });
    }

    #[test]
    fn test_hierarchical_merging() {
        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "retrieval:\n  top_k: 5\nlogging:\n  level: info\n  format: json"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(override_file, "retrieval:\n  top_k: 2\nlogging:\n  level: debug").unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.retrieval.top_k, 2, "Override should win");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.logging.format,
            LogFormat::Json,
            "Base value should persist when not overridden"
        );
    }
}
