//! Rendering errors for the terminal.

use catprompt_engine::RefineError;
use catprompt_utils::error::{ConfigError, ErrorCategory, RelayError, UserFriendlyError};
use catprompt_utils::ExitCode;

/// Render a user-facing error with context and suggestions.
pub fn render(err: &dyn UserFriendlyError) -> String {
    let mut out = format!("✗ {}", err.user_message());
    if let Some(context) = err.context() {
        out.push_str(&format!("\n  {context}"));
    }
    let suggestions = err.suggestions();
    if !suggestions.is_empty() {
        out.push_str("\n\nSuggestions:");
        for suggestion in suggestions {
            out.push_str(&format!("\n  • {suggestion}"));
        }
    }
    out
}

/// Render any error from the CLI layer, using the friendly form when the
/// root cause is one of ours.
pub fn render_anyhow(err: &anyhow::Error) -> String {
    match friendly(err) {
        Some(friendly) => render(friendly),
        None => format!("✗ {err:#}"),
    }
}

/// Exit code for an error from the CLI layer.
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    match friendly(err).map(|friendly| friendly.category()) {
        Some(ErrorCategory::Configuration) => ExitCode::CLI_ARGS,
        _ => ExitCode::INTERNAL,
    }
}

fn friendly(err: &anyhow::Error) -> Option<&dyn UserFriendlyError> {
    if let Some(config) = err.downcast_ref::<ConfigError>() {
        return Some(config);
    }
    if let Some(relay) = err.downcast_ref::<RelayError>() {
        return Some(relay);
    }
    if let Some(refine) = err.downcast_ref::<RefineError>() {
        return Some(refine);
    }
    None
}
