//! Gemini relay gateway
//!
//! Forwards an opaque generateContent body to the Gemini API, attaching the
//! server-held key. The body is never inspected or rewritten.

use crate::RelayError;
use crate::http_client::HttpClient;
use crate::types::{Relay, RelayRequest};
use async_trait::async_trait;
use catprompt_config::Config;
use catprompt_config::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_RELAY_TIMEOUT_SECS};
use catprompt_utils::redaction::redact_known_secret;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Header carrying the API key on every downstream request
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Relay that talks to the Gemini API directly.
#[derive(Clone)]
pub struct GeminiRelay {
    client: Arc<HttpClient>,
    base_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl std::fmt::Debug for GeminiRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiRelay")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiRelay {
    /// Create a new Gemini relay
    ///
    /// A `None` key is accepted here. Every `forward` then fails with the
    /// credential error instead of reaching the API.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Configuration` if the HTTP client cannot be constructed
    pub fn new(
        api_key: Option<String>,
        base_url: Option<String>,
        model: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, RelayError> {
        let client = HttpClient::new()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            timeout: timeout.unwrap_or(Duration::from_secs(DEFAULT_RELAY_TIMEOUT_SECS)),
        })
    }

    /// Create a relay from configuration, reading the key from the
    /// environment variable named by `[relay] api_key_env`.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Configuration` if the HTTP client cannot be constructed
    pub fn new_from_config(config: &Config) -> Result<Self, RelayError> {
        let api_key_env = config.api_key_env();
        let api_key = std::env::var(api_key_env).ok();
        if api_key.is_none() {
            warn!(
                api_key_env,
                "API key variable is not set; requests will be rejected"
            );
        }

        Self::new(
            api_key,
            Some(config.base_url().to_string()),
            Some(config.model().to_string()),
            Some(config.relay_timeout()),
        )
    }

    /// Whether a credential is configured.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Full generateContent URL for the configured model.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl Relay for GeminiRelay {
    async fn forward(&self, request: RelayRequest) -> Result<Value, RelayError> {
        if request.method != Method::POST {
            return Err(RelayError::MethodNotAllowed);
        }

        let Some(api_key) = self.api_key.as_deref() else {
            return Err(RelayError::missing_credential());
        };

        let Some(payload) = request.payload.filter(|payload| !payload.is_null()) else {
            return Err(RelayError::MissingPayload);
        };

        debug!(
            relay = "gemini",
            model = %self.model,
            timeout_secs = self.timeout.as_secs(),
            "Forwarding payload to generative API"
        );

        let builder = self
            .client
            .request(Method::POST, &self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&payload);

        let response = self
            .client
            .execute(builder, self.timeout, "gemini")
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.map_err(|e| {
                RelayError::Internal(format!("Failed to read error body from Gemini: {e}"))
            })?;
            let detail = redact_known_secret(&raw, api_key);
            warn!(
                relay = "gemini",
                status = status.as_u16(),
                "Generative API rejected request"
            );
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                detail,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RelayError::Internal(format!("Failed to parse Gemini response: {e}")))?;

        debug!(relay = "gemini", "Received response from generative API");
        Ok(body)
    }
}
