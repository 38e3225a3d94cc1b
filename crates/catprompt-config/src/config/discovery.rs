use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{CliArgs, Config, ConfigSource, RelayConfig, ServerConfig, SessionConfig};

/// Directory name searched for during discovery
pub const CONFIG_DIR_NAME: &str = ".catprompt";

/// Config file name inside [`CONFIG_DIR_NAME`] or `CATPROMPT_HOME`
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable pointing at a directory holding `config.toml`
pub const HOME_ENV: &str = "CATPROMPT_HOME";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    relay: Option<RelayConfig>,
    server: Option<ServerConfig>,
    session: Option<SessionConfig>,
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// File lookup order: `--config`, then `$CATPROMPT_HOME/config.toml`, then an
    /// upward search from the current directory, then the user config dir
    /// (`~/.config/catprompt/config.toml` on Linux).
    pub fn discover(cli_args: &CliArgs) -> Result<Self> {
        if cli_args.config_path.is_none() {
            if let Some(home) = std::env::var_os(HOME_ENV) {
                let path = PathBuf::from(home).join(CONFIG_FILE_NAME);
                // An empty home means defaults, not a search elsewhere.
                let args = CliArgs {
                    config_path: path.exists().then_some(path),
                    ..cli_args.clone()
                };
                if args.config_path.is_none() {
                    let mut config = Config::defaults();
                    config.apply_cli(&args);
                    config.validate()?;
                    return Ok(config);
                }
                return Self::discover_from(Path::new("."), &args);
            }
        }

        let start_dir = std::env::current_dir().context("Failed to get current directory")?;
        let config = Self::discover_from(&start_dir, cli_args)?;
        if config.loaded_from_file() || cli_args.config_path.is_some() {
            return Ok(config);
        }

        match dirs::config_dir().map(|dir| dir.join("catprompt").join(CONFIG_FILE_NAME)) {
            Some(user_path) if user_path.exists() => {
                let args = CliArgs {
                    config_path: Some(user_path),
                    ..cli_args.clone()
                };
                Self::discover_from(&start_dir, &args)
            }
            _ => Ok(config),
        }
    }

    /// Discover and load configuration starting from a specific directory
    ///
    /// This is the path-driven variant used by tests to avoid process-global
    /// state. It never consults `CATPROMPT_HOME` or the user config dir.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self> {
        let mut config = Config::defaults();

        let config_path = if let Some(explicit_path) = &cli_args.config_path {
            if !explicit_path.exists() {
                return Err(catprompt_utils::ConfigError::NotFound {
                    path: explicit_path.display().to_string(),
                }
                .into());
            }
            Some(explicit_path.clone())
        } else {
            Self::discover_config_file_from(start_dir)?
        };

        if let Some(path) = &config_path {
            let file_config = Self::load_config_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;
            config.apply_file(file_config);
        }

        config.apply_cli(cli_args);
        config.validate()?;
        Ok(config)
    }

    /// Search upward from `start_dir` for `.catprompt/config.toml`
    ///
    /// Stops at the filesystem root or at a repository root (a directory
    /// holding `.git`, `.hg` or `.svn`).
    pub fn discover_config_file_from(start_dir: &Path) -> Result<Option<PathBuf>> {
        let mut current_dir = start_dir.to_path_buf();

        loop {
            let config_path = current_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Ok(Some(config_path));
            }

            if current_dir.join(".git").exists()
                || current_dir.join(".hg").exists()
                || current_dir.join(".svn").exists()
            {
                break;
            }

            match current_dir.parent() {
                Some(parent) => current_dir = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    fn loaded_from_file(&self) -> bool {
        self.source_attribution
            .values()
            .any(|source| *source == ConfigSource::Config)
    }

    /// Load configuration from TOML file
    fn load_config_file(path: &Path) -> Result<TomlConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: TomlConfig = toml::from_str(&content).map_err(|e| {
            catprompt_utils::ConfigError::InvalidFile(format!("{}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    fn apply_file(&mut self, file: TomlConfig) {
        let source = ConfigSource::Config;

        if let Some(relay) = file.relay {
            if relay.api_key_env.is_some() {
                self.relay.api_key_env = relay.api_key_env;
                self.attribute("api_key_env", source.clone());
            }
            if relay.base_url.is_some() {
                self.relay.base_url = relay.base_url;
                self.attribute("base_url", source.clone());
            }
            if relay.model.is_some() {
                self.relay.model = relay.model;
                self.attribute("model", source.clone());
            }
            if relay.timeout_secs.is_some() {
                self.relay.timeout_secs = relay.timeout_secs;
                self.attribute("timeout_secs", source.clone());
            }
        }

        if let Some(server) = file.server {
            if server.listen.is_some() {
                self.server.listen = server.listen;
                self.attribute("listen", source.clone());
            }
        }

        if let Some(session) = file.session {
            if session.relay_url.is_some() {
                self.session.relay_url = session.relay_url;
                self.attribute("relay_url", source.clone());
            }
            if session.translation_language.is_some() {
                self.session.translation_language = session.translation_language;
                self.attribute("translation_language", source.clone());
            }
            if session.variation_count.is_some() {
                self.session.variation_count = session.variation_count;
                self.attribute("variation_count", source.clone());
            }
            if session.copy_ack_ms.is_some() {
                self.session.copy_ack_ms = session.copy_ack_ms;
                self.attribute("copy_ack_ms", source.clone());
            }
            if session.verbose.is_some() {
                self.session.verbose = session.verbose;
                self.attribute("verbose", source);
            }
        }
    }

    fn apply_cli(&mut self, cli_args: &CliArgs) {
        if let Some(listen) = &cli_args.listen {
            self.server.listen = Some(listen.clone());
            self.attribute("listen", ConfigSource::Cli);
        }
        if let Some(relay_url) = &cli_args.relay_url {
            self.session.relay_url = Some(relay_url.clone());
            self.attribute("relay_url", ConfigSource::Cli);
        }
        if let Some(model) = &cli_args.model {
            self.relay.model = Some(model.clone());
            self.attribute("model", ConfigSource::Cli);
        }
        if let Some(verbose) = cli_args.verbose {
            self.session.verbose = Some(verbose);
            self.attribute("verbose", ConfigSource::Cli);
        }
    }

    pub(crate) fn attribute(&mut self, key: &str, source: ConfigSource) {
        self.source_attribution.insert(key.to_string(), source);
    }
}
