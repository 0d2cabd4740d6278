//! Error types for the Samsara connector
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Transport failures are wrapped exactly once and never retried.

use thiserror::Error;

/// The main error type for the connector
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    /// Any transport-level failure: network error or non-2xx status. Carries
    /// the HTTP status when one was received, `None` for connection-level
    /// failures. Never retried.
    #[error("Samsara API request failed: {message}")]
    ApiRequest {
        message: String,
        status: Option<u16>,
    },

    // ============================================================================
    // Parameter Errors
    // ============================================================================
    #[error("Unparseable timestamp: {value}")]
    InvalidTimestamp { value: String },

    #[error("Invalid operation parameters: {message}")]
    InvalidParameter { message: String },

    // ============================================================================
    // Webhook Errors
    // ============================================================================
    #[error("Webhook registration failed: {message}")]
    WebhookRegistration { message: String },

    #[error("State error: {message}")]
    State { message: String },

    // ============================================================================
    // I/O & Generic
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Wrap a transport failure without an HTTP status (network-level)
    pub fn api_request(message: impl Into<String>) -> Self {
        Self::ApiRequest {
            message: message.into(),
            status: None,
        }
    }

    /// Wrap a non-2xx response
    pub fn api_status(status: u16, message: impl Into<String>) -> Self {
        Self::ApiRequest {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Create an invalid timestamp error
    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create a webhook registration error
    pub fn webhook_registration(message: impl Into<String>) -> Self {
        Self::WebhookRegistration {
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// The HTTP status carried by a transport error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiRequest { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether this is a transport error for a missing remote entity
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type alias for the connector
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("api_token");
        assert_eq!(err.to_string(), "Missing required config field: api_token");

        let err = Error::api_status(404, "HTTP 404: Not found");
        assert_eq!(
            err.to_string(),
            "Samsara API request failed: HTTP 404: Not found"
        );
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(Error::api_status(503, "unavailable").status(), Some(503));
        assert_eq!(Error::api_request("connection refused").status(), None);
        assert_eq!(Error::config("x").status(), None);
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::api_status(404, "gone").is_not_found());
        assert!(!Error::api_status(500, "boom").is_not_found());
        assert!(!Error::api_request("timeout").is_not_found());
    }
}
