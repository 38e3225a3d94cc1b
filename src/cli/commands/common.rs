//! Helpers shared by the session and generate commands.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::{ClipboardSink, Config, Orchestrator, RefineSettings};

/// Build an orchestrator over the relay selected by `config`.
pub fn build_orchestrator(
    config: &Config,
    clipboard: Option<Arc<dyn ClipboardSink>>,
) -> Result<Orchestrator> {
    let relay = crate::relay::from_config(config).context("failed to build relay")?;
    let orchestrator = Orchestrator::new(relay, RefineSettings::from_config(config));
    Ok(match clipboard {
        Some(clipboard) => orchestrator.with_clipboard(clipboard),
        None => orchestrator,
    })
}
