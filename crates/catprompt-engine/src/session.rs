//! Session state: the active prompt, its derived artifacts and the
//! generation counter that ties them together.
//!
//! Everything here is synchronous. The orchestrator wraps a [`Session`] in a
//! watch channel and applies these transitions inside short, non-async
//! critical sections.

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, info};

use crate::artifact::{ArtifactKind, ArtifactValue};
use crate::clipboard::CopyAck;
use crate::error::RefineError;
use crate::slot::{ArtifactSlot, CommitOutcome, Generation};

/// One slot per [`ArtifactKind`], indexed by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts([ArtifactSlot<ArtifactValue>; 5]);

impl Artifacts {
    #[must_use]
    pub fn get(&self, kind: ArtifactKind) -> &ArtifactSlot<ArtifactValue> {
        &self.0[kind.index()]
    }

    fn get_mut(&mut self, kind: ArtifactKind) -> &mut ArtifactSlot<ArtifactValue> {
        &mut self.0[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArtifactKind, &ArtifactSlot<ArtifactValue>)> {
        ArtifactKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    fn reset(&mut self) {
        for slot in &mut self.0 {
            *slot = ArtifactSlot::Idle;
        }
    }
}

impl Serialize for Artifacts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ArtifactKind::ALL.len()))?;
        for (kind, slot) in self.iter() {
            map.serialize_entry(&kind, slot)?;
        }
        map.end()
    }
}

/// Observable state of one refinement session.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Session {
    generation: Generation,
    prompt: ArtifactSlot<String>,
    artifacts: Artifacts,
    copy_ack: Option<CopyAck>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The top-level prompt slot.
    #[must_use]
    pub fn prompt(&self) -> &ArtifactSlot<String> {
        &self.prompt
    }

    /// The active prompt, present only once a generation has succeeded.
    #[must_use]
    pub fn active_prompt(&self) -> Option<&str> {
        self.prompt.value().map(String::as_str)
    }

    #[must_use]
    pub fn artifact(&self, kind: ArtifactKind) -> &ArtifactSlot<ArtifactValue> {
        self.artifacts.get(kind)
    }

    #[must_use]
    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    #[must_use]
    pub fn copy_ack(&self) -> Option<&CopyAck> {
        self.copy_ack.as_ref()
    }

    /// Start a new base prompt generation.
    ///
    /// Bumps the counter, marks the prompt pending and resets every artifact,
    /// which also clears any previous prompt error.
    pub fn begin_generate(&mut self) -> Generation {
        self.generation += 1;
        self.prompt = ArtifactSlot::Pending {
            generation: self.generation,
        };
        self.artifacts.reset();
        info!(generation = self.generation, "Base prompt generation started");
        self.generation
    }

    /// Mark `kind` pending against the current prompt.
    ///
    /// Returns the generation and a copy of the prompt to derive from.
    ///
    /// # Errors
    ///
    /// `RefineError::Precondition` when there is no active prompt; nothing is
    /// changed in that case.
    pub fn begin_refine(
        &mut self,
        kind: ArtifactKind,
    ) -> Result<(Generation, String), RefineError> {
        let prompt = self
            .active_prompt()
            .ok_or(RefineError::Precondition { operation: kind })?
            .to_string();
        *self.artifacts.get_mut(kind) = ArtifactSlot::Pending {
            generation: self.generation,
        };
        debug!(generation = self.generation, artifact = %kind, "Refinement started");
        Ok((self.generation, prompt))
    }

    /// Commit the base prompt result of `generation` if it is still current.
    pub fn commit_prompt(
        &mut self,
        generation: Generation,
        result: Result<String, RefineError>,
    ) -> CommitOutcome {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "Discarding stale base prompt result"
            );
            return CommitOutcome::Discarded;
        }
        info!(generation, ok = result.is_ok(), "Base prompt committed");
        self.prompt.settle(generation, result);
        CommitOutcome::Applied
    }

    /// Commit an artifact result of `generation` if it is still current.
    ///
    /// Within one generation the last result to arrive wins.
    pub fn commit_artifact(
        &mut self,
        kind: ArtifactKind,
        generation: Generation,
        result: Result<ArtifactValue, RefineError>,
    ) -> CommitOutcome {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                artifact = %kind,
                "Discarding stale refinement result"
            );
            return CommitOutcome::Discarded;
        }
        info!(generation, artifact = %kind, ok = result.is_ok(), "Refinement committed");
        self.artifacts.get_mut(kind).settle(generation, result);
        CommitOutcome::Applied
    }

    /// Publish a copy acknowledgement, superseding any earlier one.
    pub fn show_copy_ack(&mut self, ack: CopyAck) {
        self.copy_ack = Some(ack);
    }

    /// Clear the acknowledgement if it is still the one identified by `token`.
    ///
    /// Returns whether anything changed.
    pub fn clear_copy_ack(&mut self, token: u64) -> bool {
        match &self.copy_ack {
            Some(ack) if ack.token == token => {
                self.copy_ack = None;
                true
            }
            _ => false,
        }
    }
}
