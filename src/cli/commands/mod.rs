//! CLI command implementations.

mod common;
mod config;
mod generate;
mod serve;
mod session;

pub use config::execute_config_command;
pub use generate::execute_generate_command;
pub use serve::execute_serve_command;
pub use session::execute_session_command;
