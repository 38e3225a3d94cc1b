use std::path::PathBuf;

/// Values from the command line that take part in configuration precedence.
///
/// The CLI layer fills this from its clap arguments; library users can
/// leave it at `Default` to get file + default behaviour.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file path (skips discovery)
    pub config_path: Option<PathBuf>,
    /// Relay server listen address
    pub listen: Option<String>,
    /// Remote relay URL for sessions
    pub relay_url: Option<String>,
    /// Generative model override
    pub model: Option<String>,
    /// Verbose logging
    pub verbose: Option<bool>,
}
