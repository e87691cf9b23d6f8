//! Configuration management for the answer engine
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default.*`, `config/{env}.*`)
//! - Environment variables (`ANSWER_ENGINE__` prefix, `__` separator)
//! - Runtime overrides on the returned `Settings`

pub mod constants;
pub mod settings;
pub mod tracing_init;

pub use settings::{
    load_settings, load_settings_from, ModelRouterConfig, ObservabilityConfig, PipelineConfig,
    RuntimeEnvironment, SearchServiceConfig, Settings,
};
pub use tracing_init::init_tracing;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Tracing initialization failed: {0}")]
    Tracing(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
