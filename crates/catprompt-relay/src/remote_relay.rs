//! Client for a relay running as a separate HTTP server
//!
//! Speaks the relay wire contract: `POST {"payload": ...}` in, either the
//! downstream body or `{"message": ...}` with a status code out.

use crate::RelayError;
use crate::http_client::HttpClient;
use crate::types::{ErrorBody, Relay, RelayEnvelope, RelayRequest};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone, Debug)]
pub struct RemoteRelay {
    client: Arc<HttpClient>,
    url: String,
    timeout: Duration,
}

impl RemoteRelay {
    /// Create a client for the relay endpoint at `url`
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Configuration` if the HTTP client cannot be constructed
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RelayError> {
        Ok(Self {
            client: Arc::new(HttpClient::new()?),
            url: url.into(),
            timeout,
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Relay for RemoteRelay {
    async fn forward(&self, request: RelayRequest) -> Result<Value, RelayError> {
        debug!(
            relay = "remote",
            url = %self.url,
            method = %request.method,
            "Sending payload to relay"
        );

        let envelope = RelayEnvelope {
            payload: request.payload,
        };
        let builder = self
            .client
            .request(request.method, &self.url)
            .json(&envelope);

        let response = self
            .client
            .execute(builder, self.timeout, "relay")
            .await?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::Internal(format!("Failed to read relay response: {e}")))?;

        if status.is_success() {
            return serde_json::from_slice(&bytes)
                .map_err(|e| RelayError::Internal(format!("Failed to parse relay response: {e}")));
        }

        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .map(|body| body.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        warn!(relay = "remote", status = status.as_u16(), %message, "Relay returned an error");
        Err(RelayError::from_wire(status.as_u16(), &message))
    }
}
