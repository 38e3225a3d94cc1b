//! Core types for the relay boundary

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::RelayError;

/// One call into the relay: the caller's method and an opaque payload.
///
/// The payload is the generative API request body. The relay never looks
/// inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayRequest {
    pub method: Method,
    pub payload: Option<Value>,
}

impl RelayRequest {
    #[must_use]
    pub fn new(method: Method, payload: Option<Value>) -> Self {
        Self { method, payload }
    }

    /// A POST carrying `payload`, the only shape the relay accepts.
    #[must_use]
    pub fn post(payload: Value) -> Self {
        Self::new(Method::POST, Some(payload))
    }
}

/// Request body on the relay wire: `{"payload": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelayEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// Normalized error body on the relay wire: `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl From<&RelayError> for ErrorBody {
    fn from(err: &RelayError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Trait for relay implementations
///
/// The orchestrator talks to the generative API only through this trait, so
/// it works the same against the in-process gateway, a remote relay server,
/// or a test double.
#[async_trait]
pub trait Relay: Send + Sync {
    /// Forward one request and return the downstream JSON body verbatim.
    ///
    /// # Errors
    ///
    /// Returns `RelayError` for a rejected method, missing payload, missing
    /// credential, non-2xx downstream status, or network/parse failure.
    async fn forward(&self, request: RelayRequest) -> Result<Value, RelayError>;
}
