//! Trigger methods: a synchronous begin step followed by an async completion.

use catprompt_relay::{Relay, RelayRequest};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::Orchestrator;
use crate::artifact::ArtifactKind;
use crate::error::RefineError;
use crate::payload;
use crate::response;
use crate::slot::{CommitOutcome, Generation};

/// Work issued by a begin step: the generation it belongs to and the request
/// body. A payload that could not be built fails the slot at completion.
struct Ticket {
    generation: Generation,
    payload: Result<Value, RefineError>,
}

impl Orchestrator {
    /// Generate a new base prompt and wait for it to settle.
    ///
    /// Resets every artifact immediately. Returns `Discarded` if another
    /// generation started while this one was in flight.
    pub async fn generate_prompt(&self) -> CommitOutcome {
        let ticket = self.begin_generate();
        self.complete_generate(ticket).await
    }

    /// Start a new base prompt generation on a Tokio task.
    ///
    /// The reset has already happened when this returns.
    pub fn spawn_generate_prompt(&self) -> JoinHandle<CommitOutcome> {
        let ticket = self.begin_generate();
        let this = self.clone();
        tokio::spawn(async move { this.complete_generate(ticket).await })
    }

    /// Derive `kind` from the active prompt and wait for it to settle.
    ///
    /// # Errors
    ///
    /// `RefineError::Precondition` when there is no active prompt. No request
    /// is issued and the slot is left as it was. Every other failure is
    /// committed into the slot instead.
    pub async fn refine(&self, kind: ArtifactKind) -> Result<CommitOutcome, RefineError> {
        let ticket = self.begin_refine(kind)?;
        Ok(self.complete_refine(kind, ticket).await)
    }

    /// Start deriving `kind` on a Tokio task.
    ///
    /// # Errors
    ///
    /// `RefineError::Precondition` when there is no active prompt, checked
    /// before anything is spawned.
    pub fn spawn_refine(
        &self,
        kind: ArtifactKind,
    ) -> Result<JoinHandle<CommitOutcome>, RefineError> {
        let ticket = self.begin_refine(kind)?;
        let this = self.clone();
        Ok(tokio::spawn(async move {
            this.complete_refine(kind, ticket).await
        }))
    }

    /// # Errors
    ///
    /// See [`Orchestrator::refine`].
    pub async fn generate_variations(&self) -> Result<CommitOutcome, RefineError> {
        self.refine(ArtifactKind::Variations).await
    }

    /// # Errors
    ///
    /// See [`Orchestrator::refine`].
    pub async fn generate_story(&self) -> Result<CommitOutcome, RefineError> {
        self.refine(ArtifactKind::Story).await
    }

    /// # Errors
    ///
    /// See [`Orchestrator::refine`].
    pub async fn expand_prompt(&self) -> Result<CommitOutcome, RefineError> {
        self.refine(ArtifactKind::Expansion).await
    }

    /// # Errors
    ///
    /// See [`Orchestrator::refine`].
    pub async fn generate_hashtags(&self) -> Result<CommitOutcome, RefineError> {
        self.refine(ArtifactKind::Hashtags).await
    }

    /// # Errors
    ///
    /// See [`Orchestrator::refine`].
    pub async fn translate_prompt(&self) -> Result<CommitOutcome, RefineError> {
        self.refine(ArtifactKind::Translation).await
    }

    fn begin_generate(&self) -> Ticket {
        let payload = payload::base_prompt_payload();
        let mut generation = 0;
        self.state.send_modify(|session| {
            generation = session.begin_generate();
        });
        Ticket {
            generation,
            payload,
        }
    }

    fn begin_refine(&self, kind: ArtifactKind) -> Result<Ticket, RefineError> {
        let mut begun = Err(RefineError::Precondition { operation: kind });
        self.state.send_if_modified(|session| {
            begun = session.begin_refine(kind);
            begun.is_ok()
        });

        let (generation, prompt) = begun.inspect_err(|_| {
            debug!(artifact = %kind, "Refinement rejected: no active prompt");
        })?;
        Ok(Ticket {
            generation,
            payload: payload::refinement_payload(kind, &prompt, &self.settings.instructions),
        })
    }

    async fn complete_generate(&self, ticket: Ticket) -> CommitOutcome {
        let result = match ticket.payload {
            Ok(payload) => self
                .forward(payload)
                .await
                .and_then(|body| response::parse_prompt(&body)),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            warn!(generation = ticket.generation, error = %err, "Base prompt generation failed");
        }

        let mut outcome = CommitOutcome::Discarded;
        self.state.send_if_modified(|session| {
            outcome = session.commit_prompt(ticket.generation, result);
            outcome.is_applied()
        });
        outcome
    }

    async fn complete_refine(&self, kind: ArtifactKind, ticket: Ticket) -> CommitOutcome {
        let result = match ticket.payload {
            Ok(payload) => self
                .forward(payload)
                .await
                .and_then(|body| response::parse_artifact(kind, &body)),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            warn!(
                generation = ticket.generation,
                artifact = %kind,
                error = %err,
                "Refinement failed"
            );
        }

        let mut outcome = CommitOutcome::Discarded;
        self.state.send_if_modified(|session| {
            outcome = session.commit_artifact(kind, ticket.generation, result);
            outcome.is_applied()
        });
        outcome
    }

    async fn forward(&self, payload: Value) -> Result<Value, RefineError> {
        self.relay
            .forward(RelayRequest::post(payload))
            .await
            .map_err(RefineError::from)
    }
}
