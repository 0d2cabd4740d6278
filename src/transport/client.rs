//! Authenticated API client
//!
//! Issues one outbound HTTP call per invocation against the Samsara REST
//! API. Credential attachment is a bearer token header; transport failures
//! (network errors and non-2xx statuses) are wrapped once into
//! [`Error::ApiRequest`] and never retried.

use super::envelope::{ApiEnvelope, WireEnvelope};
use crate::error::{Error, Result};
use crate::types::{JsonValue, Method, StringMap};
use std::time::Duration;
use tracing::debug;

/// Production API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.samsara.com";

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// API token, sent as `Authorization: Bearer <token>`
    pub api_token: String,
    /// Base URL for all requests
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl ApiClientConfig {
    /// Create a config for the production API with the given token.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("samsara-connector/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Override the base URL (tests, regional clusters).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Authenticated HTTP client for the Samsara API
pub struct ApiClient {
    client: reqwest::Client,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new client.
    pub fn new(config: ApiClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Issue one API request and resolve the response envelope.
    ///
    /// Empty body objects and empty query maps are stripped entirely rather
    /// than sent as `{}` / `?`. An empty response body resolves to an
    /// envelope with an absent payload.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&JsonValue>,
        query: &StringMap,
    ) -> Result<ApiEnvelope> {
        let url = self.build_url(path);
        let mut request = self
            .client
            .request(method.into(), &url)
            .bearer_auth(&self.config.api_token);

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(body) = body {
            if !is_empty_object(body) {
                request = request.json(body);
            }
        }

        debug!(?method, %url, "issuing API request");

        let response = request
            .send()
            .await
            .map_err(|e| Error::api_request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api_status(
                status.as_u16(),
                format!("HTTP {}: {body}", status.as_u16()),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::api_request(e.to_string()))?;

        if text.trim().is_empty() {
            return Ok(ApiEnvelope::default());
        }

        let wire: WireEnvelope = serde_json::from_str(&text)
            .map_err(|e| Error::api_request(format!("invalid JSON in response: {e}")))?;
        Ok(wire.into())
    }

    /// Shorthand for a body-less GET.
    pub async fn get(&self, path: &str, query: &StringMap) -> Result<ApiEnvelope> {
        self.request(Method::GET, path, None, query).await
    }

    /// Credential self-test: fetch a single vehicle.
    pub async fn check_connection(&self) -> Result<()> {
        let mut query = StringMap::new();
        query.insert("limit".into(), "1".into());
        self.get("/fleet/vehicles", &query).await?;
        Ok(())
    }

    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

/// Bodies reduced to `{}` by selective field copying are not sent at all.
fn is_empty_object(value: &JsonValue) -> bool {
    matches!(value, JsonValue::Object(map) if map.is_empty())
}
