//! Refinement orchestrator
//!
//! Owns one [`Session`] and drives every operation against it through a
//! [`Relay`]. Session state lives in a `tokio::sync::watch` channel: readers
//! take snapshots or subscribe to changes, and every mutation is a short
//! synchronous `send_modify`/`send_if_modified` that never spans an `.await`.
//!
//! Each trigger comes in two forms. The async form (`generate_prompt`,
//! `refine`) runs the request to completion. The spawning form
//! (`spawn_generate_prompt`, `spawn_refine`) performs the synchronous begin
//! step immediately, so preconditions are checked and the slot is pending by
//! the time it returns, then hands the relay call to a Tokio task.

mod copy;
mod dispatch;

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Duration;

use catprompt_config::Config;
use catprompt_relay::Relay;
use tokio::sync::watch;

use crate::artifact::{ArtifactKind, ArtifactValue};
use crate::clipboard::{ClipboardSink, CopyAck, MemoryClipboard};
use crate::prompts::InstructionSettings;
use crate::session::Session;
use crate::slot::{ArtifactSlot, Generation};

/// Knobs for one orchestrator instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefineSettings {
    pub instructions: InstructionSettings,
    /// How long a copy acknowledgement stays visible
    pub copy_ack: Duration,
}

impl Default for RefineSettings {
    fn default() -> Self {
        Self {
            instructions: InstructionSettings::default(),
            copy_ack: Duration::from_millis(catprompt_config::DEFAULT_COPY_ACK_MS),
        }
    }
}

impl RefineSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            instructions: InstructionSettings {
                variation_count: config.variation_count(),
                translation_language: config.translation_language().to_string(),
            },
            copy_ack: config.copy_ack_duration(),
        }
    }
}

/// Single-session refinement orchestrator.
///
/// Cloning is cheap and every clone drives the same session, which is how
/// spawned tasks commit their results.
#[derive(Clone)]
pub struct Orchestrator {
    relay: Arc<dyn Relay>,
    settings: Arc<RefineSettings>,
    clipboard: Arc<dyn ClipboardSink>,
    state: Arc<watch::Sender<Session>>,
    copy_tokens: Arc<AtomicU64>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("settings", &self.settings)
            .field("session", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Create an orchestrator with an in-memory clipboard.
    #[must_use]
    pub fn new(relay: Arc<dyn Relay>, settings: RefineSettings) -> Self {
        let (state, _) = watch::channel(Session::new());
        Self {
            relay,
            settings: Arc::new(settings),
            clipboard: Arc::new(MemoryClipboard::new()),
            state: Arc::new(state),
            copy_tokens: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Replace the clipboard sink.
    #[must_use]
    pub fn with_clipboard(mut self, clipboard: Arc<dyn ClipboardSink>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Copy of the whole session as it is right now.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver notified after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.state.borrow().generation()
    }

    #[must_use]
    pub fn active_prompt(&self) -> Option<String> {
        self.state.borrow().active_prompt().map(str::to_string)
    }

    #[must_use]
    pub fn prompt_slot(&self) -> ArtifactSlot<String> {
        self.state.borrow().prompt().clone()
    }

    #[must_use]
    pub fn artifact(&self, kind: ArtifactKind) -> ArtifactSlot<ArtifactValue> {
        self.state.borrow().artifact(kind).clone()
    }

    #[must_use]
    pub fn copy_ack(&self) -> Option<CopyAck> {
        self.state.borrow().copy_ack().cloned()
    }
}
