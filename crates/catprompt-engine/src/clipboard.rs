//! Clipboard sinks and the copy acknowledgement.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("Nothing to copy: {what} is not ready")]
    NothingToCopy { what: String },

    #[error("Failed to write to clipboard: {0}")]
    Write(String),
}

/// Destination for copied text.
pub trait ClipboardSink: Send + Sync {
    /// # Errors
    ///
    /// Returns `ClipboardError::Write` if the text could not be delivered.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard holding the last copied text.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.lock().unwrap_or_else(|e| e.into_inner()) = Some(text.to_string());
        Ok(())
    }
}

/// Clipboard of the controlling terminal, reached with an OSC 52 escape.
///
/// Works over SSH as long as the terminal emulator honours OSC 52.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalClipboard;

impl ClipboardSink for TerminalClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        use crossterm::clipboard::CopyToClipboard;

        crossterm::execute!(
            std::io::stdout(),
            CopyToClipboard::to_clipboard_from(text.as_bytes())
        )
        .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

/// Transient "copied" notice shown after a successful copy.
///
/// Each copy gets a fresh `token`; the clear timer only removes the notice
/// whose token it was started for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyAck {
    pub token: u64,
    pub label: String,
    pub copied_at: DateTime<Utc>,
}
