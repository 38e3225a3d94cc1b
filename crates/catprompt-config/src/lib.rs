//! Layered configuration for catprompt.
//!
//! Precedence is CLI > config file > built-in defaults. See [`Config`] for the
//! file format and [`ConfigBuilder`] for programmatic construction.

mod config;

pub use config::*;
pub use catprompt_utils::error::ConfigError;
