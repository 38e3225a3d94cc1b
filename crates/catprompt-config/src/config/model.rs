use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use catprompt_utils::types::ConfigSource;

/// Default environment variable holding the relay credential
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default generative API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default generative model
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default per-request relay timeout in seconds
pub const DEFAULT_RELAY_TIMEOUT_SECS: u64 = 60;

/// Default relay server listen address
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

/// Default translation target language
pub const DEFAULT_TRANSLATION_LANGUAGE: &str = "Spanish";

/// Default number of prompt variations requested
pub const DEFAULT_VARIATION_COUNT: u32 = 3;

/// Default lifetime of the copy-to-clipboard acknowledgement in milliseconds
pub const DEFAULT_COPY_ACK_MS: u64 = 2000;

/// Configuration for catprompt.
///
/// `Config` provides hierarchical configuration with discovery and precedence:
/// CLI arguments > config file > built-in defaults.
///
/// # Discovery
///
/// Use [`Config::discover()`] for CLI-like behavior that:
/// - Respects the `CATPROMPT_HOME` environment variable
/// - Searches for `.catprompt/config.toml` upward from the current directory
/// - Applies built-in defaults for unspecified values
///
/// # Configuration File Format
///
/// ```toml
/// [relay]
/// api_key_env = "GEMINI_API_KEY"
/// base_url = "https://generativelanguage.googleapis.com/v1beta"
/// model = "gemini-1.5-flash"
/// timeout_secs = 60
///
/// [server]
/// listen = "127.0.0.1:3000"
///
/// [session]
/// relay_url = "http://127.0.0.1:3000/api/generate"
/// translation_language = "Spanish"
/// variation_count = 3
/// copy_ack_ms = 2000
/// verbose = false
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Relay gateway settings (credential lookup, downstream endpoint).
    pub relay: RelayConfig,
    /// Relay HTTP server settings.
    pub server: ServerConfig,
    /// Refinement session settings.
    pub session: SessionConfig,
    /// Source attribution for each setting (for `catprompt config`).
    pub source_attribution: HashMap<String, ConfigSource>,
}

/// `[relay]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RelayConfig {
    /// Name of the environment variable that holds the API key.
    /// The key itself never lives in the config file.
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `[server]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub listen: Option<String>,
}

/// `[session]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    /// When set, the session talks to a relay server at this URL instead of
    /// calling the generative API in-process.
    pub relay_url: Option<String>,
    pub translation_language: Option<String>,
    pub variation_count: Option<u32>,
    pub copy_ack_ms: Option<u64>,
    pub verbose: Option<bool>,
}

impl Config {
    /// Built-in defaults with every key attributed to [`ConfigSource::Default`].
    #[must_use]
    pub fn defaults() -> Self {
        let mut source_attribution = HashMap::new();
        for key in TRACKED_KEYS {
            source_attribution.insert((*key).to_string(), ConfigSource::Default);
        }

        Self {
            relay: RelayConfig::default(),
            server: ServerConfig::default(),
            session: SessionConfig::default(),
            source_attribution,
        }
    }

    #[must_use]
    pub fn api_key_env(&self) -> &str {
        self.relay
            .api_key_env
            .as_deref()
            .unwrap_or(DEFAULT_API_KEY_ENV)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.relay.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.relay.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    #[must_use]
    pub fn relay_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(
            self.relay
                .timeout_secs
                .unwrap_or(DEFAULT_RELAY_TIMEOUT_SECS),
        )
    }

    #[must_use]
    pub fn listen(&self) -> &str {
        self.server.listen.as_deref().unwrap_or(DEFAULT_LISTEN)
    }

    #[must_use]
    pub fn relay_url(&self) -> Option<&str> {
        self.session.relay_url.as_deref()
    }

    #[must_use]
    pub fn translation_language(&self) -> &str {
        self.session
            .translation_language
            .as_deref()
            .unwrap_or(DEFAULT_TRANSLATION_LANGUAGE)
    }

    #[must_use]
    pub fn variation_count(&self) -> u32 {
        self.session
            .variation_count
            .unwrap_or(DEFAULT_VARIATION_COUNT)
    }

    #[must_use]
    pub fn copy_ack_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.session.copy_ack_ms.unwrap_or(DEFAULT_COPY_ACK_MS))
    }

    #[must_use]
    pub fn verbose(&self) -> bool {
        self.session.verbose.unwrap_or(false)
    }
}

/// Keys reported by [`Config::effective_config`], in display order.
pub(crate) const TRACKED_KEYS: &[&str] = &[
    "api_key_env",
    "base_url",
    "model",
    "timeout_secs",
    "listen",
    "relay_url",
    "translation_language",
    "variation_count",
    "copy_ack_ms",
    "verbose",
];
