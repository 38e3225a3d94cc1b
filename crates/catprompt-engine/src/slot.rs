use serde::Serialize;

use crate::error::RefineError;

/// Value of the generation counter that a request was issued against.
pub type Generation = u64;

/// Lifecycle of one asynchronously produced value.
///
/// `Idle -> Pending -> Ready | Failed`, and back to `Idle` whenever a new
/// base prompt generation begins. Non-idle states carry the generation they
/// belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ArtifactSlot<T> {
    Idle,
    Pending {
        generation: Generation,
    },
    Ready {
        value: T,
        generation: Generation,
    },
    Failed {
        error: RefineError,
        generation: Generation,
    },
}

impl<T> Default for ArtifactSlot<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> ArtifactSlot<T> {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ready { value, .. } => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&RefineError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    #[must_use]
    pub fn generation(&self) -> Option<Generation> {
        match self {
            Self::Idle => None,
            Self::Pending { generation }
            | Self::Ready { generation, .. }
            | Self::Failed { generation, .. } => Some(*generation),
        }
    }

    #[must_use]
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending { .. } => "pending",
            Self::Ready { .. } => "ready",
            Self::Failed { .. } => "failed",
        }
    }

    /// Settle the slot with the outcome of a request from `generation`.
    pub(crate) fn settle(&mut self, generation: Generation, result: Result<T, RefineError>) {
        *self = match result {
            Ok(value) => Self::Ready { value, generation },
            Err(error) => Self::Failed { error, generation },
        };
    }
}

/// What happened to a completed request's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitOutcome {
    /// The result was written into its slot
    Applied,
    /// The generation moved on while the request was in flight
    Discarded,
}

impl CommitOutcome {
    #[must_use]
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        let slot: ArtifactSlot<String> = ArtifactSlot::default();
        assert!(slot.is_idle());
        assert_eq!(slot.generation(), None);
        assert_eq!(slot.value(), None);
    }

    #[test]
    fn test_settle_ok_and_err() {
        let mut slot: ArtifactSlot<String> = ArtifactSlot::Pending { generation: 4 };
        slot.settle(4, Ok("done".to_string()));
        assert_eq!(slot.value().map(String::as_str), Some("done"));
        assert_eq!(slot.generation(), Some(4));

        slot.settle(4, Err(RefineError::malformed("bad")));
        assert_eq!(slot.state_name(), "failed");
        assert_eq!(slot.error().map(ToString::to_string).as_deref(), Some("bad"));
    }

    #[test]
    fn test_serialized_shape() {
        let slot = ArtifactSlot::Ready {
            value: "x".to_string(),
            generation: 2,
        };
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json, serde_json::json!({"state": "ready", "value": "x", "generation": 2}));

        let idle: ArtifactSlot<String> = ArtifactSlot::Idle;
        assert_eq!(serde_json::to_value(&idle).unwrap(), serde_json::json!({"state": "idle"}));
    }
}
