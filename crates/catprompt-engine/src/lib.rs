//! Prompt refinement orchestrator
//!
//! Tracks one active cat-image prompt and five artifacts derived from it
//! (variations, story, expansion, hashtags, translation). Every artifact has
//! its own [`ArtifactSlot`] lifecycle, and a generation counter keeps results
//! from an older prompt out of the current session.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use catprompt_engine::{ArtifactKind, Orchestrator, RefineSettings};
//!
//! # use catprompt_engine::RefineError;
//! # async fn demo(relay: Arc<dyn catprompt_relay::Relay>) -> Result<(), RefineError> {
//! let orchestrator = Orchestrator::new(relay, RefineSettings::default());
//! orchestrator.generate_prompt().await;
//! orchestrator.refine(ArtifactKind::Hashtags).await?;
//! println!("{}", serde_json::to_string_pretty(&orchestrator.snapshot()).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod clipboard;
pub mod error;
pub mod orchestrator;
pub mod payload;
pub mod prompts;
pub mod response;
pub mod session;
pub mod slot;

pub use artifact::{ArtifactKind, ArtifactValue};
pub use clipboard::{ClipboardError, ClipboardSink, CopyAck, MemoryClipboard, TerminalClipboard};
pub use error::RefineError;
pub use orchestrator::{Orchestrator, RefineSettings};
pub use session::Session;
pub use slot::{ArtifactSlot, CommitOutcome, Generation};
