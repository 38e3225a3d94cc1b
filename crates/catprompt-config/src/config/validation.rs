use std::net::SocketAddr;

use catprompt_utils::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if let Some(timeout) = self.relay.timeout_secs {
            if timeout == 0 || timeout > 600 {
                return Err(ConfigError::InvalidValue {
                    key: "timeout_secs".to_string(),
                    value: format!("{timeout} (must be between 1 and 600 seconds)"),
                });
            }
        }

        if let Some(model) = &self.relay.model {
            if model.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "model".to_string(),
                    value: "must not be empty".to_string(),
                });
            }
        }

        if let Some(env_name) = &self.relay.api_key_env {
            if env_name.trim().is_empty() || env_name.contains('=') {
                return Err(ConfigError::InvalidValue {
                    key: "api_key_env".to_string(),
                    value: format!("'{env_name}' is not a valid environment variable name"),
                });
            }
        }

        if let Some(base_url) = &self.relay.base_url {
            if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    key: "base_url".to_string(),
                    value: format!("'{base_url}' must start with http:// or https://"),
                });
            }
        }

        if let Some(listen) = &self.server.listen {
            if listen.parse::<SocketAddr>().is_err() {
                return Err(ConfigError::InvalidValue {
                    key: "listen".to_string(),
                    value: format!("'{listen}' is not a socket address (expected host:port)"),
                });
            }
        }

        if let Some(relay_url) = &self.session.relay_url {
            if !(relay_url.starts_with("http://") || relay_url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    key: "relay_url".to_string(),
                    value: format!("'{relay_url}' must start with http:// or https://"),
                });
            }
        }

        if let Some(language) = &self.session.translation_language {
            if language.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "translation_language".to_string(),
                    value: "must not be empty".to_string(),
                });
            }
        }

        if let Some(count) = self.session.variation_count {
            if !(1..=10).contains(&count) {
                return Err(ConfigError::InvalidValue {
                    key: "variation_count".to_string(),
                    value: format!("{count} (must be between 1 and 10)"),
                });
            }
        }

        if let Some(ack_ms) = self.session.copy_ack_ms {
            if !(500..=10_000).contains(&ack_ms) {
                return Err(ConfigError::InvalidValue {
                    key: "copy_ack_ms".to_string(),
                    value: format!("{ack_ms} (must be between 500 and 10000 milliseconds)"),
                });
            }
        }

        Ok(())
    }
}
