use catprompt_utils::error::{ErrorCategory, RelayError, UserFriendlyError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::artifact::ArtifactKind;

/// Reason committed when the base prompt response carries no usable text
pub const PROMPT_FAILED_MESSAGE: &str = "Failed to generate prompt.";

/// Reason committed when a response does not have the expected shape
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid response format";

/// Failure of one refinement operation.
///
/// Every variant except `Precondition` is committed into the slot it belongs
/// to. `Precondition` is returned from the trigger and never reaches a slot.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RefineError {
    /// Relay credential or setup problem; re-triggering will not help
    #[error("{message}")]
    Configuration { message: String },

    /// The generative API rejected the request
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// The response arrived but did not have the expected shape
    #[error("{reason}")]
    MalformedResponse { reason: String },

    /// Relay-internal or network failure
    #[error("{message}")]
    Transport { message: String },

    /// No active prompt to derive from
    #[error("No active prompt: generate a base prompt before requesting {operation}")]
    Precondition { operation: ArtifactKind },
}

impl RefineError {
    pub(crate) fn malformed(reason: &str) -> Self {
        Self::MalformedResponse {
            reason: reason.to_string(),
        }
    }

    /// Whether re-triggering the same operation could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Upstream { .. } | Self::MalformedResponse { .. } | Self::Transport { .. }
        )
    }
}

impl From<RelayError> for RefineError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Configuration(message) => Self::Configuration { message },
            RelayError::Upstream { status, .. } => Self::Upstream {
                status,
                message: err.to_string(),
            },
            RelayError::Internal(ref detail) => {
                warn!(
                    detail = %catprompt_utils::redaction::redact_error_message(detail),
                    "Relay transport failure"
                );
                Self::Transport {
                    message: err.to_string(),
                }
            }
            RelayError::MethodNotAllowed | RelayError::MissingPayload => Self::Transport {
                message: err.to_string(),
            },
        }
    }
}

impl UserFriendlyError for RefineError {
    fn user_message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Configuration { .. } => {
                Some("The relay could not attach its API key to the request.".to_string())
            }
            Self::Upstream { status, .. } => Some(format!(
                "The generative API answered with status {status}."
            )),
            Self::MalformedResponse { .. } => Some(
                "The generative API answered, but not with the expected content.".to_string(),
            ),
            Self::Transport { .. } => None,
            Self::Precondition { .. } => Some(
                "Refinements are derived from the active prompt, and there is none yet."
                    .to_string(),
            ),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Configuration { .. } => vec![
                "Set the API key on the relay (see `catprompt config`)".to_string(),
            ],
            Self::Upstream { .. } | Self::MalformedResponse { .. } | Self::Transport { .. } => {
                vec!["Trigger the operation again".to_string()]
            }
            Self::Precondition { .. } => vec!["Run `generate` first".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Upstream { .. } => ErrorCategory::Upstream,
            Self::MalformedResponse { .. } | Self::Precondition { .. } => {
                ErrorCategory::Validation
            }
            Self::Transport { .. } => ErrorCategory::Internal,
        }
    }
}
