//! CLI argument definitions and parsing structures

use catprompt_engine::ArtifactKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// catprompt - cat image prompt generator
#[derive(Parser, Debug)]
#[command(name = "catprompt")]
#[command(about = "Generate and refine cat image prompts through a Gemini relay")]
#[command(long_about = r#"
catprompt generates short, vivid cat image prompts and derives variations,
a story, an expanded description, hashtags and a translation from them.

The Gemini key never leaves the relay: `catprompt serve` holds it and exposes
POST /api/generate, and `session`/`generate` either call Gemini in-process or
go through a relay given with --relay-url.

EXAMPLES:
  # Run the relay on the default address
  GEMINI_API_KEY=... catprompt serve

  # Interactive session against a running relay
  catprompt session --relay-url http://127.0.0.1:3000/api/generate

  # One-shot prompt with hashtags and a story, printed as JSON
  catprompt generate --with hashtags --with story

  # Show the effective configuration and where each value came from
  catprompt config

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is $CATPROMPT_HOME/config.toml, or discovered by searching upward
  from CWD for .catprompt/config.toml. Use --config to give an explicit path.
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Gemini model name
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the relay HTTP server
    ///
    /// Reads the API key from the environment variable named by
    /// `relay.api_key_env` (GEMINI_API_KEY by default).
    Serve {
        /// Address to listen on (e.g. 127.0.0.1:3000)
        #[arg(long)]
        listen: Option<String>,
    },

    /// Interactive session over stdin
    ///
    /// Commands: generate, variations, story, expand, hashtags, translate,
    /// copy <prompt|artifact>, show, help, quit.
    Session {
        /// Relay endpoint to use instead of calling Gemini directly
        #[arg(long)]
        relay_url: Option<String>,

        /// Copy through the terminal (OSC 52) instead of an in-process buffer
        #[arg(long)]
        terminal_clipboard: bool,
    },

    /// Generate one prompt, derive artifacts and print the session as JSON
    Generate {
        /// Artifact to derive (variations, story, expansion, hashtags, translation)
        #[arg(long = "with", value_name = "KIND")]
        with: Vec<ArtifactKind>,

        /// Relay endpoint to use instead of calling Gemini directly
        #[arg(long)]
        relay_url: Option<String>,
    },

    /// Print the effective configuration with sources
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_accepts_aliases() {
        let cli = Cli::try_parse_from([
            "catprompt",
            "generate",
            "--with",
            "tags",
            "--with",
            "Story",
            "--with",
            "translate",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate { with, relay_url } => {
                assert_eq!(
                    with,
                    vec![
                        ArtifactKind::Hashtags,
                        ArtifactKind::Story,
                        ArtifactKind::Translation
                    ]
                );
                assert!(relay_url.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = Cli::try_parse_from(["catprompt", "generate", "--with", "haiku"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["catprompt", "serve", "--listen", "0.0.0.0:8080", "-v"])
            .unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Serve { listen: Some(ref addr) } if addr == "0.0.0.0:8080"
        ));
    }
}
