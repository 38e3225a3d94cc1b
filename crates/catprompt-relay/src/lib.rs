//! Relay gateway to the generative-content API
//!
//! The relay forwards an opaque payload to the Gemini API using a credential
//! that only the server holds. All relays implement the [`Relay`] trait, so
//! callers work the same whether the gateway runs in-process or behind HTTP.

mod gemini_backend;
pub(crate) mod http_client;
mod remote_relay;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;
mod types;

pub use catprompt_config as config;
pub use catprompt_utils::error::RelayError;

pub use gemini_backend::GeminiRelay;
pub use remote_relay::RemoteRelay;
pub use types::{ErrorBody, Relay, RelayEnvelope, RelayRequest};

use crate::config::Config;
use std::sync::Arc;
use tracing::info;

/// Construct the relay a session should talk to.
///
/// With `[session] relay_url` set the session goes through that relay server.
/// Otherwise it uses an in-process [`GeminiRelay`], which reads the key from
/// the local environment.
///
/// # Errors
///
/// Returns `RelayError::Configuration` if the HTTP client cannot be constructed.
pub fn from_config(config: &Config) -> Result<Arc<dyn Relay>, RelayError> {
    match config.relay_url() {
        Some(url) => {
            info!(relay = "remote", url, "Using relay server");
            Ok(Arc::new(RemoteRelay::new(url, config.relay_timeout())?))
        }
        None => {
            info!(relay = "gemini", model = config.model(), "Using in-process relay");
            Ok(Arc::new(GeminiRelay::new_from_config(config)?))
        }
    }
}
