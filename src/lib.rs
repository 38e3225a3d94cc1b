//! catprompt - cat image prompt generator with a credential-holding relay
//!
//! The workspace is split into four crates, re-exported here:
//!
//! - [`catprompt_relay`]: forwards an opaque Gemini request body using a
//!   server-held key ([`GeminiRelay`]) or through another relay over HTTP
//!   ([`RemoteRelay`])
//! - [`catprompt_engine`]: the [`Orchestrator`] holding the active prompt and
//!   its five derived artifacts, with stale-result discard
//! - [`catprompt_config`]: layered configuration ([`Config`])
//! - [`catprompt_utils`]: error taxonomy, exit codes, logging and redaction
//!
//! This crate adds the HTTP surface ([`server`]) and the `catprompt` binary
//! ([`cli`]).
//!
//! # Quick Start (Library)
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use catprompt::{ArtifactKind, Config, Orchestrator, RefineSettings};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = Config::builder().model("gemini-1.5-flash").build()?;
//! let relay = catprompt::relay::from_config(&config)?;
//! let orchestrator = Orchestrator::new(relay, RefineSettings::from_config(&config));
//!
//! orchestrator.generate_prompt().await;
//! orchestrator.refine(ArtifactKind::Hashtags).await?;
//! println!("{}", serde_json::to_string_pretty(&orchestrator.snapshot())?);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod error_reporter;
pub mod server;

pub use catprompt_relay as relay;

pub use catprompt_config::{CliArgs, Config, ConfigBuilder, ConfigSource};
pub use catprompt_engine::{
    ArtifactKind, ArtifactSlot, ArtifactValue, ClipboardError, ClipboardSink, CommitOutcome,
    CopyAck, Generation, MemoryClipboard, Orchestrator, RefineError, RefineSettings, Session,
    TerminalClipboard,
};
pub use catprompt_relay::{GeminiRelay, Relay, RelayError, RemoteRelay};
pub use catprompt_utils::{ConfigError, ExitCode, UserFriendlyError};
