//! Configuration for the balcao attendant.
//!
//! Settings are layered, highest priority last:
//! - `config/default.yaml`
//! - `config/{env}.yaml` when an environment name is given
//! - environment variables with the `BALCAO` prefix (`BALCAO__SERVER__PORT`)

pub mod settings;

pub use settings::{
    load_settings, AttendantConfig, CatalogConfig, GatewayConfig, ObservabilityConfig,
    RuntimeEnvironment, ServerConfig, Settings, StoreConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
