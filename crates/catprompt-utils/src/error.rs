use thiserror::Error;

/// Message returned when the relay is called with anything but POST.
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Only POST requests allowed";

/// Message returned when the relay has no credential to attach.
pub const MISSING_CREDENTIAL_MESSAGE: &str = "API key not configured on server";

/// Message returned when the relay request carries no payload.
pub const MISSING_PAYLOAD_MESSAGE: &str = "Request body must contain a payload.";

/// Message returned for network or parse failures inside the relay.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

/// Prefix put in front of raw downstream error text.
pub const UPSTREAM_ERROR_PREFIX: &str = "Generative API error: ";

/// Trait for errors that can be rendered for an end user.
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Request,
    Upstream,
    Validation,
    Internal,
}

/// Failures of the relay gateway.
///
/// Every variant maps to a fixed HTTP status (see [`RelayError::status_code`]),
/// and its `Display` output is exactly the `message` field of the relay's
/// normalized error body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Caller used a method other than POST
    #[error("Only POST requests allowed")]
    MethodNotAllowed,

    /// Request body carried no payload
    #[error("Request body must contain a payload.")]
    MissingPayload,

    /// Server-side credential is not configured; the downstream is never called
    #[error("{0}")]
    Configuration(String),

    /// Downstream answered with a non-2xx status
    #[error("Generative API error: {detail}")]
    Upstream { status: u16, detail: String },

    /// Network or parse failure; the detail is kept for logs only
    #[error("An internal server error occurred.")]
    Internal(String),
}

impl RelayError {
    /// Credential-missing error with the canonical message.
    #[must_use]
    pub fn missing_credential() -> Self {
        Self::Configuration(MISSING_CREDENTIAL_MESSAGE.to_string())
    }

    /// HTTP status carried by this error on the relay wire.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MethodNotAllowed => 405,
            Self::MissingPayload => 400,
            Self::Configuration(_) => 500,
            Self::Upstream { status, .. } => *status,
            Self::Internal(_) => 500,
        }
    }

    /// Rebuild a relay error from a status code and the `message` of a
    /// normalized error body.
    ///
    /// Upstream errors are recognized by their message prefix, so a downstream
    /// 500 is not confused with a relay-internal 500. Relay errors are only
    /// recognized by their exact message; anything else in front of the relay
    /// (a proxy answering 400, say) stays an upstream error with its text.
    #[must_use]
    pub fn from_wire(status: u16, message: &str) -> Self {
        if let Some(detail) = message.strip_prefix(UPSTREAM_ERROR_PREFIX) {
            return Self::Upstream {
                status,
                detail: detail.to_string(),
            };
        }
        match status {
            405 if message == METHOD_NOT_ALLOWED_MESSAGE => Self::MethodNotAllowed,
            400 if message == MISSING_PAYLOAD_MESSAGE => Self::MissingPayload,
            500 if message == MISSING_CREDENTIAL_MESSAGE => {
                Self::Configuration(message.to_string())
            }
            500 => Self::Internal(message.to_string()),
            other => Self::Upstream {
                status: other,
                detail: message.to_string(),
            },
        }
    }

    /// Whether re-triggering the same request could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::Internal(_))
    }
}

impl UserFriendlyError for RelayError {
    fn user_message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::MethodNotAllowed | Self::MissingPayload => Some(
                "The relay accepts a single POST with a JSON body of the form {\"payload\": ...}."
                    .to_string(),
            ),
            Self::Configuration(_) => Some(
                "The relay attaches a server-held API key to every forwarded request.".to_string(),
            ),
            Self::Upstream { status, .. } => Some(format!(
                "The generative API rejected the request with status {status}."
            )),
            Self::Internal(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MethodNotAllowed => vec!["Send the request with POST".to_string()],
            Self::MissingPayload => {
                vec!["Wrap the generateContent body in a \"payload\" field".to_string()]
            }
            Self::Configuration(_) => vec![
                "Export the API key in the variable named by [relay] api_key_env \
                 (default GEMINI_API_KEY)"
                    .to_string(),
                "Restart the relay after changing its environment".to_string(),
            ],
            Self::Upstream { status, .. } if *status == 429 => {
                vec!["Wait a moment before trying again".to_string()]
            }
            Self::Upstream { .. } | Self::Internal(_) => {
                vec!["Trigger the operation again".to_string()]
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::MethodNotAllowed | Self::MissingPayload => ErrorCategory::Request,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Upstream { .. } => ErrorCategory::Upstream,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(reason) => {
                format!("Configuration file has invalid format: {reason}")
            }
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::NotFound { path } => {
                format!("Configuration file not found: {path}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) => {
                Some(
                    "Configuration files use TOML with [relay], [server] and [session] sections."
                        .to_string(),
                )
            }
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the TOML syntax of .catprompt/config.toml".to_string(),
            ],
            Self::InvalidValue { key, .. } => {
                vec![format!("Fix '{key}' or remove it to use the default")]
            }
            Self::NotFound { .. } => vec![
                "Pass an existing file to --config or drop the flag to use discovery".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_error_status_codes() {
        assert_eq!(RelayError::MethodNotAllowed.status_code(), 405);
        assert_eq!(RelayError::MissingPayload.status_code(), 400);
        assert_eq!(RelayError::missing_credential().status_code(), 500);
        assert_eq!(RelayError::Internal("boom".into()).status_code(), 500);
        assert_eq!(
            RelayError::Upstream {
                status: 429,
                detail: "quota".into()
            }
            .status_code(),
            429
        );
    }

    #[test]
    fn test_relay_error_messages_match_wire_contract() {
        assert_eq!(
            RelayError::MethodNotAllowed.to_string(),
            METHOD_NOT_ALLOWED_MESSAGE
        );
        assert_eq!(RelayError::MissingPayload.to_string(), MISSING_PAYLOAD_MESSAGE);
        assert_eq!(
            RelayError::missing_credential().to_string(),
            MISSING_CREDENTIAL_MESSAGE
        );
        assert_eq!(
            RelayError::Internal("socket closed".into()).to_string(),
            INTERNAL_ERROR_MESSAGE
        );
        assert_eq!(
            RelayError::Upstream {
                status: 400,
                detail: "bad schema".into()
            }
            .to_string(),
            "Generative API error: bad schema"
        );
    }

    #[test]
    fn test_from_wire_inverts_display() {
        let cases = vec![
            RelayError::MethodNotAllowed,
            RelayError::MissingPayload,
            RelayError::missing_credential(),
            RelayError::Upstream {
                status: 503,
                detail: "overloaded".into(),
            },
            RelayError::Upstream {
                status: 500,
                detail: "backend crashed".into(),
            },
        ];

        for err in cases {
            let rebuilt = RelayError::from_wire(err.status_code(), &err.to_string());
            assert_eq!(rebuilt, err);
        }
    }

    #[test]
    fn test_from_wire_internal_keeps_message() {
        let err = RelayError::from_wire(500, INTERNAL_ERROR_MESSAGE);
        assert_eq!(err, RelayError::Internal(INTERNAL_ERROR_MESSAGE.to_string()));
        assert_eq!(err.to_string(), INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_unprefixed_non_500_is_upstream() {
        let err = RelayError::from_wire(502, "Bad Gateway");
        assert_eq!(
            err,
            RelayError::Upstream {
                status: 502,
                detail: "Bad Gateway".into()
            }
        );
    }

    #[test]
    fn test_foreign_400_and_405_keep_their_text() {
        assert_eq!(
            RelayError::from_wire(400, "Request header too large"),
            RelayError::Upstream {
                status: 400,
                detail: "Request header too large".into()
            }
        );
        assert_eq!(
            RelayError::from_wire(405, "Method Not Allowed"),
            RelayError::Upstream {
                status: 405,
                detail: "Method Not Allowed".into()
            }
        );
        assert_eq!(
            RelayError::from_wire(400, MISSING_PAYLOAD_MESSAGE),
            RelayError::MissingPayload
        );
    }

    #[test]
    fn test_retryable_classification() {
        assert!(!RelayError::missing_credential().is_retryable());
        assert!(!RelayError::MissingPayload.is_retryable());
        assert!(RelayError::Internal(String::new()).is_retryable());
        assert!(
            RelayError::Upstream {
                status: 500,
                detail: String::new()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_user_friendly_categories() {
        assert_eq!(
            RelayError::missing_credential().category(),
            ErrorCategory::Configuration
        );
        assert!(!RelayError::missing_credential().suggestions().is_empty());
        assert_eq!(
            ConfigError::NotFound {
                path: "missing.toml".into()
            }
            .category(),
            ErrorCategory::Configuration
        );
    }
}
