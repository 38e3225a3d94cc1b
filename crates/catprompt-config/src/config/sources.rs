use super::Config;
use super::model::TRACKED_KEYS;

impl Config {
    /// Effective configuration as `(key, value, source)` rows in display order.
    ///
    /// Unset optional values are shown as `(unset)`. The API key itself is
    /// never reported; only the name of the variable it is read from.
    #[must_use]
    pub fn effective_config(&self) -> Vec<(String, String, String)> {
        TRACKED_KEYS
            .iter()
            .map(|key| {
                let value = match *key {
                    "api_key_env" => self.api_key_env().to_string(),
                    "base_url" => self.base_url().to_string(),
                    "model" => self.model().to_string(),
                    "timeout_secs" => self.relay_timeout().as_secs().to_string(),
                    "listen" => self.listen().to_string(),
                    "relay_url" => self.relay_url().unwrap_or("(unset)").to_string(),
                    "translation_language" => self.translation_language().to_string(),
                    "variation_count" => self.variation_count().to_string(),
                    "copy_ack_ms" => self.copy_ack_duration().as_millis().to_string(),
                    "verbose" => self.verbose().to_string(),
                    _ => String::new(),
                };
                let source = self
                    .source_attribution
                    .get(*key)
                    .map(|source| source.as_str())
                    .unwrap_or("default");
                ((*key).to_string(), value, source.to_string())
            })
            .collect()
    }
}
