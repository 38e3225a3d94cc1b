//! Shared HTTP client infrastructure for relay implementations
//!
//! One `reqwest::Client` per relay, configured once, with connection reuse and
//! a per-request timeout. There is deliberately no retry loop here: a user
//! re-trigger is the only retry mechanism.

use catprompt_utils::redaction::redact_error_message;
use reqwest::{Client, Method, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;

use crate::RelayError;

/// Connect timeout applied to every request
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Idle pooled connections are dropped after this long
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Clone, Debug)]
pub(crate) struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Configuration` if the client cannot be constructed
    pub fn new() -> Result<Self, RelayError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| RelayError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Execute a request once with the given timeout.
    ///
    /// Any status code is returned as `Ok`; interpreting it is the caller's
    /// job. Transport failures map to `RelayError::Internal` with the detail
    /// redacted.
    pub async fn execute(
        &self,
        request_builder: RequestBuilder,
        timeout: Duration,
        target: &str,
    ) -> Result<Response, RelayError> {
        let request = request_builder
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Internal(format!("Failed to build request: {}", e)))?;

        debug!(
            target_name = target,
            timeout_secs = timeout.as_secs(),
            "Executing HTTP request"
        );

        self.client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                RelayError::Internal(format!("{target} request timed out after {timeout:?}"))
            } else {
                RelayError::Internal(format!(
                    "{target} request failed: {}",
                    redact_error_message(&e.to_string())
                ))
            }
        })
    }
}
