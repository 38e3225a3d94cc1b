//! Foundation utilities shared by every catprompt crate.
//!
//! - [`error`]: relay and configuration error taxonomy plus the
//!   [`UserFriendlyError`](error::UserFriendlyError) reporting trait
//! - [`exit_codes`]: process exit codes for the CLI
//! - [`logging`]: `tracing` subscriber setup
//! - [`redaction`]: scrubbing credentials out of error text before it is logged
//! - [`types`]: small shared value types

pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod redaction;
pub mod types;

pub use error::{ConfigError, ErrorCategory, RelayError, UserFriendlyError};
pub use exit_codes::ExitCode;
