use std::sync::Arc;
use std::sync::atomic::Ordering;

use chrono::Utc;
use tracing::debug;

use super::Orchestrator;
use crate::artifact::ArtifactKind;
use crate::clipboard::{ClipboardError, CopyAck};

impl Orchestrator {
    /// Write `text` to the clipboard and show a transient acknowledgement.
    ///
    /// The acknowledgement clears itself after the configured duration. A
    /// newer copy replaces it, and the older timer then leaves the newer one
    /// alone. Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// `ClipboardError::Write` if the sink rejects the text; no
    /// acknowledgement is shown in that case.
    pub fn copy_text(&self, label: &str, text: &str) -> Result<CopyAck, ClipboardError> {
        self.clipboard.write_text(text)?;

        let ack = CopyAck {
            token: self.copy_tokens.fetch_add(1, Ordering::Relaxed) + 1,
            label: label.to_string(),
            copied_at: Utc::now(),
        };
        self.state.send_modify(|session| session.show_copy_ack(ack.clone()));
        debug!(label, token = ack.token, "Copied to clipboard");

        let state = Arc::clone(&self.state);
        let hold = self.settings.copy_ack;
        let token = ack.token;
        tokio::spawn(async move {
            tokio::time::sleep(hold).await;
            state.send_if_modified(|session| session.clear_copy_ack(token));
        });

        Ok(ack)
    }

    /// Copy the active prompt.
    ///
    /// # Errors
    ///
    /// `ClipboardError::NothingToCopy` when there is no active prompt.
    pub fn copy_prompt(&self) -> Result<CopyAck, ClipboardError> {
        let text = self
            .active_prompt()
            .ok_or_else(|| ClipboardError::NothingToCopy {
                what: "prompt".to_string(),
            })?;
        self.copy_text("prompt", &text)
    }

    /// Copy a ready artifact. Lists are joined one item per line, hashtags
    /// on a single line.
    ///
    /// # Errors
    ///
    /// `ClipboardError::NothingToCopy` when the artifact is not ready.
    pub fn copy_artifact(&self, kind: ArtifactKind) -> Result<CopyAck, ClipboardError> {
        let text = self
            .artifact(kind)
            .value()
            .map(|value| value.to_text(kind.list_separator()))
            .ok_or_else(|| ClipboardError::NothingToCopy {
                what: kind.to_string(),
            })?;
        self.copy_text(&kind.to_string(), &text)
    }
}
