use std::time::Duration;

use catprompt_utils::ConfigError;

use super::{Config, ConfigSource};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Use this when embedding the orchestrator and you need behaviour that
    /// does not depend on config files in the user's environment.
    ///
    /// # Example
    ///
    /// ```rust
    /// use catprompt_config::Config;
    /// use std::time::Duration;
    ///
    /// let config = Config::builder()
    ///     .model("gemini-1.5-flash")
    ///     .relay_timeout(Duration::from_secs(30))
    ///     .translation_language("Japanese")
    ///     .build()
    ///     .expect("valid config");
    /// assert_eq!(config.translation_language(), "Japanese");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for programmatic configuration.
///
/// All values set via the builder are attributed to
/// [`ConfigSource::Programmatic`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    api_key_env: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    relay_timeout: Option<Duration>,
    listen: Option<String>,
    relay_url: Option<String>,
    translation_language: Option<String>,
    variation_count: Option<u32>,
    copy_ack: Option<Duration>,
    verbose: Option<bool>,
}

impl ConfigBuilder {
    /// Create a new `ConfigBuilder` with no values set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the environment variable holding the API key.
    #[must_use]
    pub fn api_key_env(mut self, name: impl Into<String>) -> Self {
        self.api_key_env = Some(name.into());
        self
    }

    /// Base URL of the generative API (useful for pointing at a local stub).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Per-request relay timeout. Sub-second precision is dropped.
    #[must_use]
    pub fn relay_timeout(mut self, timeout: Duration) -> Self {
        self.relay_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn listen(mut self, addr: impl Into<String>) -> Self {
        self.listen = Some(addr.into());
        self
    }

    #[must_use]
    pub fn relay_url(mut self, url: impl Into<String>) -> Self {
        self.relay_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn translation_language(mut self, language: impl Into<String>) -> Self {
        self.translation_language = Some(language.into());
        self
    }

    #[must_use]
    pub fn variation_count(mut self, count: u32) -> Self {
        self.variation_count = Some(count);
        self
    }

    #[must_use]
    pub fn copy_ack(mut self, duration: Duration) -> Self {
        self.copy_ack = Some(duration);
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value fails validation.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut config = Config::defaults();
        let source = ConfigSource::Programmatic;

        if let Some(name) = self.api_key_env {
            config.relay.api_key_env = Some(name);
            config.attribute("api_key_env", source.clone());
        }
        if let Some(url) = self.base_url {
            config.relay.base_url = Some(url);
            config.attribute("base_url", source.clone());
        }
        if let Some(model) = self.model {
            config.relay.model = Some(model);
            config.attribute("model", source.clone());
        }
        if let Some(timeout) = self.relay_timeout {
            config.relay.timeout_secs = Some(timeout.as_secs());
            config.attribute("timeout_secs", source.clone());
        }
        if let Some(listen) = self.listen {
            config.server.listen = Some(listen);
            config.attribute("listen", source.clone());
        }
        if let Some(url) = self.relay_url {
            config.session.relay_url = Some(url);
            config.attribute("relay_url", source.clone());
        }
        if let Some(language) = self.translation_language {
            config.session.translation_language = Some(language);
            config.attribute("translation_language", source.clone());
        }
        if let Some(count) = self.variation_count {
            config.session.variation_count = Some(count);
            config.attribute("variation_count", source.clone());
        }
        if let Some(ack) = self.copy_ack {
            config.session.copy_ack_ms = Some(ack.as_millis() as u64);
            config.attribute("copy_ack_ms", source.clone());
        }
        if let Some(verbose) = self.verbose {
            config.session.verbose = Some(verbose);
            config.attribute("verbose", source);
        }

        config.validate()?;
        Ok(config)
    }
}
