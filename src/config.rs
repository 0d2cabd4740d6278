//! Credentials and connector configuration
//!
//! One secret string (the API token) plus transport settings, loadable
//! from a YAML file or the environment. The trigger subscription for
//! `serve` mode has its own YAML-backed configuration.

use crate::error::{Error, Result};
use crate::transport::{ApiClientConfig, DEFAULT_BASE_URL};
use crate::webhook::TriggerSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the API token
pub const TOKEN_ENV_VAR: &str = "SAMSARA_API_TOKEN";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV_VAR: &str = "SAMSARA_BASE_URL";

/// Connector configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConnectorConfig {
    /// API token, sent as a bearer header
    #[serde(default)]
    pub api_token: String,
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ConnectorConfig {
    /// Load from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from the environment (`SAMSARA_API_TOKEN`, `SAMSARA_BASE_URL`).
    pub fn from_env() -> Self {
        Self {
            api_token: std::env::var(TOKEN_ENV_VAR).unwrap_or_default(),
            base_url: std::env::var(BASE_URL_ENV_VAR).unwrap_or_else(|_| default_base_url()),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<()> {
        if self.api_token.is_empty() {
            return Err(Error::missing_field("api_token"));
        }
        Ok(())
    }

    /// Convert into transport client configuration.
    pub fn client_config(&self) -> ApiClientConfig {
        ApiClientConfig::new(&self.api_token)
            .with_base_url(&self.base_url)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

/// Configuration for the `serve` (trigger) mode
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerConfig {
    /// Subscription settings (name, callback URL, events, filters)
    #[serde(flatten)]
    pub subscription: TriggerSettings,
    /// File persisting the subscription record across restarts
    #[serde(default)]
    pub state_path: Option<PathBuf>,
}

impl TriggerConfig {
    /// Load from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the callback URL parses and at least one event is configured.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.subscription.callback_url)?;
        if self.subscription.events.is_empty() {
            return Err(Error::config("trigger requires at least one event type"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_config_defaults() {
        let config: ConnectorConfig = serde_yaml::from_str("api_token: tok").unwrap();
        assert_eq!(config.api_token, "tok");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_token_fails_validation() {
        let config = ConnectorConfig::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));
    }

    #[test]
    fn test_trigger_config_parsing() {
        let yaml = r"
name: Fleet events
callbackUrl: https://example.com/webhook
events:
  - GeofenceEntry
  - GeofenceExit
tagIds: '1,2'
";
        let config: TriggerConfig = serde_yaml::from_str(yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.subscription.events.len(), 2);
        assert_eq!(config.subscription.tag_ids.as_deref(), Some("1,2"));
        assert!(config.state_path.is_none());
    }

    #[test]
    fn test_trigger_config_rejects_bad_url() {
        let yaml = r"
name: Fleet events
callbackUrl: not-a-url
events: [GeofenceEntry]
";
        let config: TriggerConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_trigger_config_requires_events() {
        let yaml = r"
name: Fleet events
callbackUrl: https://example.com/webhook
events: []
";
        let config: TriggerConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }
}
