//! `catprompt generate`

use anyhow::{Context, Result};

use super::common::build_orchestrator;
use crate::{ArtifactKind, Config};

/// Generate a base prompt, derive `kinds` concurrently and print the final
/// session as JSON.
///
/// Artifact failures are part of the printed session. A failed base prompt
/// is printed too, then returned as the command's error.
pub async fn execute_generate_command(config: &Config, kinds: &[ArtifactKind]) -> Result<()> {
    let orchestrator = build_orchestrator(config, None)?;

    let mut kinds = kinds.to_vec();
    kinds.sort();
    kinds.dedup();

    orchestrator.generate_prompt().await;
    let prompt_error = orchestrator.prompt_slot().error().cloned();

    if prompt_error.is_none() {
        let handles = kinds
            .iter()
            .map(|kind| orchestrator.spawn_refine(*kind))
            .collect::<Result<Vec<_>, _>>()?;
        for handle in handles {
            handle.await.context("refinement task failed")?;
        }
    }

    let snapshot = orchestrator.snapshot();
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).context("failed to serialize session")?
    );

    match prompt_error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
