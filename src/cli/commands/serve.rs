//! `catprompt serve`

use std::net::SocketAddr;

use anyhow::{Context, Result};

use crate::Config;
use crate::server::run_server;

/// Run the relay server on the configured address until Ctrl-C.
pub async fn execute_serve_command(config: &Config) -> Result<()> {
    let listen: SocketAddr = config
        .listen()
        .parse()
        .with_context(|| format!("invalid listen address: {}", config.listen()))?;
    run_server(config, listen).await
}
