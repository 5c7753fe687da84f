//! Main settings module.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Relaxed validation, warnings only.
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Whether required fields must actually be present.
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Webhook/HTTP server.
    #[serde(default)]
    pub server: ServerConfig,

    /// Outbound chat gateway client.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// SQLite store.
    #[serde(default)]
    pub store: StoreConfig,

    /// Product catalog file and the optional catalog artifact.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Conversation behavior.
    #[serde(default)]
    pub attendant: AttendantConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8380
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Outbound gateway client configuration.
///
/// The gateway is the process that actually holds the chat-channel
/// connection; we POST outbound sends to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_url")]
    pub base_url: String,

    /// Bearer token added to gateway requests when set.
    #[serde(default)]
    pub api_token: Option<String>,

    #[serde(default = "default_gateway_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_gateway_url() -> String {
    "http://127.0.0.1:3000".to_string()
}
fn default_gateway_timeout_ms() -> u64 {
    10_000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_gateway_url(),
            api_token: None,
            timeout_ms: default_gateway_timeout_ms(),
        }
    }
}

/// SQLite store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String {
    "data/balcao.db".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog file (YAML or JSON).
    #[serde(default = "default_catalog_path")]
    pub path: String,

    /// Reference to the shareable catalog document (path or URL the
    /// gateway can deliver). Menu option 1 reports an error notice when
    /// unset.
    #[serde(default)]
    pub artifact: Option<String>,
}

fn default_catalog_path() -> String {
    "config/catalog.yaml".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            artifact: None,
        }
    }
}

/// Conversation behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendantConfig {
    /// Channel address that receives handoff alerts and relayed
    /// messages. Required in staging/production.
    #[serde(default)]
    pub specialist_id: String,

    /// Company name used in the menu and closing messages.
    #[serde(default = "default_company_name")]
    pub company_name: String,

    /// Sessions idle longer than this are purged by the sweeper.
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u64,
}

fn default_company_name() -> String {
    "Balcão Equipamentos".to_string()
}
fn default_session_ttl_hours() -> u64 {
    24
}

impl Default for AttendantConfig {
    fn default() -> Self {
        Self {
            specialist_id: String::new(),
            company_name: default_company_name(),
            session_ttl_hours: default_session_ttl_hours(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines instead of the human format.
    #[serde(default)]
    pub log_json: bool,

    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings. In development, a missing specialist id is a
    /// warning; staging and production refuse to start without one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if self.gateway.base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "gateway.base_url".to_string(),
                message: "Gateway base URL cannot be empty".to_string(),
            });
        }

        if self.gateway.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gateway.timeout_ms".to_string(),
                message: "Timeout must be at least 1ms".to_string(),
            });
        }

        if self.store.path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.path".to_string(),
                message: "Store path cannot be empty".to_string(),
            });
        }

        if self.catalog.path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "catalog.path".to_string(),
                message: "Catalog path cannot be empty".to_string(),
            });
        }

        if self.attendant.session_ttl_hours == 0 {
            return Err(ConfigError::InvalidValue {
                field: "attendant.session_ttl_hours".to_string(),
                message: "Session TTL must be at least 1 hour".to_string(),
            });
        }

        if self.attendant.specialist_id.is_empty() {
            if self.environment.is_strict() {
                return Err(ConfigError::InvalidValue {
                    field: "attendant.specialist_id".to_string(),
                    message: "Specialist recipient is required outside development".to_string(),
                });
            }
            tracing::warn!(
                "attendant.specialist_id not configured; handoff alerts will fail to send"
            );
        }

        Ok(())
    }
}

/// Load settings from files and environment.
///
/// Priority (highest to lowest):
/// 1. Environment variables (`BALCAO` prefix, `__` separator)
/// 2. `config/{env}.yaml` (if env specified)
/// 3. `config/default.yaml`
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("BALCAO")
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

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8380);
        assert_eq!(settings.attendant.session_ttl_hours, 24);
        assert!(settings.observability.metrics_enabled);
    }

    #[test]
    fn test_defaults_pass_validation_in_development() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_port_zero_is_rejected() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_strict_environments_require_specialist() {
        let mut settings = Settings::default();
        settings.environment = RuntimeEnvironment::Production;
        assert!(settings.validate().is_err());

        settings.attendant.specialist_id = "5511888880000@c.us".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        let mut settings = Settings::default();
        settings.attendant.session_ttl_hours = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_empty_gateway_url_is_rejected() {
        let mut settings = Settings::default();
        settings.gateway.base_url = String::new();
        assert!(settings.validate().is_err());
    }
}
