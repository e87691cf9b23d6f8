//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{citations, endpoints, history};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Answer pipeline tunables
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Search collaborator client
    #[serde(default)]
    pub search: SearchServiceConfig,

    /// Model-routing collaborator client
    #[serde(default)]
    pub router: ModelRouterConfig,

    /// Logging and metrics
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Answer pipeline tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Prior turns fetched from the conversation store
    #[serde(default = "default_history_turns")]
    pub history_turns: usize,

    /// History lines prepended to the retrieval query in conversational mode
    #[serde(default = "default_history_preamble_lines")]
    pub history_preamble_lines: usize,

    /// Characters kept from previous answers in the retrieval preamble
    #[serde(default = "default_history_answer_truncate")]
    pub history_answer_truncate: usize,

    /// Characters of passage text kept in each citation excerpt
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,

    /// Language used when a request does not name one
    #[serde(default = "default_language")]
    pub default_language: String,

    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    #[serde(default)]
    pub default_max_tokens: Option<u32>,

    /// Append question and answer to the conversation store
    #[serde(default = "default_true")]
    pub record_conversations: bool,

    /// Emit an analytics event per answer
    #[serde(default = "default_true")]
    pub emit_events: bool,
}

fn default_history_turns() -> usize {
    history::DEFAULT_TURNS
}
fn default_history_preamble_lines() -> usize {
    history::DEFAULT_PREAMBLE_LINES
}
fn default_history_answer_truncate() -> usize {
    history::DEFAULT_ANSWER_TRUNCATE
}
fn default_excerpt_chars() -> usize {
    citations::DEFAULT_EXCERPT_CHARS
}
fn default_language() -> String {
    "en".to_string()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_true() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            history_turns: default_history_turns(),
            history_preamble_lines: default_history_preamble_lines(),
            history_answer_truncate: default_history_answer_truncate(),
            excerpt_chars: default_excerpt_chars(),
            default_language: default_language(),
            default_temperature: default_temperature(),
            default_max_tokens: None,
            record_conversations: true,
            emit_events: true,
        }
    }
}

/// HTTP client settings for the search collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchServiceConfig {
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Client-side request timeout
    #[serde(default = "default_search_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_search_endpoint() -> String {
    endpoints::SEARCH_DEFAULT.to_string()
}
fn default_search_timeout_ms() -> u64 {
    5_000
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            api_key: None,
            timeout_ms: default_search_timeout_ms(),
        }
    }
}

/// HTTP client settings for the model-routing collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRouterConfig {
    /// OpenAI-compatible base URL
    #[serde(default = "default_router_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used when the request carries no preference
    #[serde(default = "default_model")]
    pub default_model: String,

    #[serde(default = "default_router_timeout_ms")]
    pub timeout_ms: u64,

    /// Price per 1k prompt tokens, for cost reporting
    #[serde(default)]
    pub prompt_cost_per_1k: f64,

    /// Price per 1k completion tokens, for cost reporting
    #[serde(default)]
    pub completion_cost_per_1k: f64,
}

fn default_router_endpoint() -> String {
    endpoints::MODEL_ROUTER_DEFAULT.to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_router_timeout_ms() -> u64 {
    60_000
}

impl Default for ModelRouterConfig {
    fn default() -> Self {
        Self {
            endpoint: default_router_endpoint(),
            api_key: None,
            default_model: default_model(),
            timeout_ms: default_router_timeout_ms(),
            prompt_cost_per_1k: 0.0,
            completion_cost_per_1k: 0.0,
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level for the workspace crates
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_pipeline()?;
        self.validate_collaborators()?;
        Ok(())
    }

    fn validate_pipeline(&self) -> Result<(), ConfigError> {
        let pipeline = &self.pipeline;

        if !(0.0..=2.0).contains(&pipeline.default_temperature) {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.default_temperature".to_string(),
                message: format!(
                    "Must be between 0.0 and 2.0, got {}",
                    pipeline.default_temperature
                ),
            });
        }

        if pipeline.default_max_tokens == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.default_max_tokens".to_string(),
                message: "Must be at least 1 when set".to_string(),
            });
        }

        if pipeline.history_preamble_lines > pipeline.history_turns {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.history_preamble_lines".to_string(),
                message: format!(
                    "Cannot exceed history_turns ({})",
                    pipeline.history_turns
                ),
            });
        }

        if pipeline.excerpt_chars == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.excerpt_chars".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if pipeline.default_language.trim().is_empty() {
            return Err(ConfigError::MissingField("pipeline.default_language".to_string()));
        }

        Ok(())
    }

    fn validate_collaborators(&self) -> Result<(), ConfigError> {
        if self.search.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingField("search.endpoint".to_string()));
        }

        if self.router.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingField("router.endpoint".to_string()));
        }

        if self.router.default_model.trim().is_empty() {
            return Err(ConfigError::MissingField("router.default_model".to_string()));
        }

        if self.search.timeout_ms == 0 || self.router.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms".to_string(),
                message: "Collaborator timeouts must be at least 1ms".to_string(),
            });
        }

        if self.router.prompt_cost_per_1k < 0.0 || self.router.completion_cost_per_1k < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "router.cost".to_string(),
                message: "Token prices cannot be negative".to_string(),
            });
        }

        if self.environment.is_strict() && self.router.api_key.is_none() {
            tracing::warn!(
                environment = ?self.environment,
                "router.api_key is not set; requests rely on network-level auth"
            );
        }

        Ok(())
    }
}

/// Load settings from `config/` and the environment
///
/// Priority: env vars > `config/{env}.*` > `config/default.*` > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from an explicit configuration directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::from(dir.join("default")).required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::from(dir.join(env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("ANSWER_ENGINE")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.pipeline.history_turns, 6);
        assert_eq!(settings.pipeline.history_preamble_lines, 4);
        assert_eq!(settings.pipeline.excerpt_chars, 200);
        assert!(settings.pipeline.record_conversations);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_temperature_validation() {
        let mut settings = Settings::default();
        settings.pipeline.default_temperature = 2.5;
        assert!(settings.validate().is_err());

        settings.pipeline.default_temperature = 0.0;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_history_window_validation() {
        let mut settings = Settings::default();
        settings.pipeline.history_turns = 2;
        settings.pipeline.history_preamble_lines = 4;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_collaborator_validation() {
        let mut settings = Settings::default();
        settings.search.endpoint = " ".to_string();
        assert!(matches!(settings.validate(), Err(ConfigError::MissingField(_))));

        let mut settings = Settings::default();
        settings.router.completion_cost_per_1k = -1.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
[pipeline]
history_turns = 8
default_language = "de"

[router]
default_model = "local-llama"
"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.toml"),
            r#"
environment = "staging"

[search]
timeout_ms = 1500
"#,
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(settings.environment, RuntimeEnvironment::Staging);
        assert_eq!(settings.pipeline.history_turns, 8);
        assert_eq!(settings.pipeline.history_preamble_lines, 4);
        assert_eq!(settings.pipeline.default_language, "de");
        assert_eq!(settings.router.default_model, "local-llama");
        assert_eq!(settings.search.timeout_ms, 1500);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[pipeline]\nexcerpt_chars = 0\n",
        )
        .unwrap();

        assert!(load_settings_from(dir.path(), None).is_err());
    }

    #[test]
    fn test_missing_directory_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("absent"), None).unwrap();
        assert_eq!(settings.router.timeout_ms, 60_000);
    }
}
