//! Reading generateContent responses.

use serde::Deserialize;
use serde_json::Value;

use crate::artifact::{ArtifactKind, ArtifactValue};
use crate::error::{INVALID_FORMAT_MESSAGE, PROMPT_FAILED_MESSAGE, RefineError};

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Text of the first part of the first candidate, if there is one.
#[must_use]
pub fn extract_text(body: &Value) -> Option<String> {
    let response = GenerateContentResponse::deserialize(body).ok()?;
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text
}

/// Read the base prompt out of a response body, trimmed.
///
/// # Errors
///
/// `MalformedResponse` when there is no candidate text or it is blank.
pub fn parse_prompt(body: &Value) -> Result<String, RefineError> {
    extract_text(body)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| RefineError::malformed(PROMPT_FAILED_MESSAGE))
}

/// Parse structured output text as a JSON array of strings.
///
/// # Errors
///
/// `MalformedResponse` when the text is not exactly that.
pub fn parse_string_list(text: &str) -> Result<Vec<String>, RefineError> {
    serde_json::from_str(text.trim()).map_err(|_| RefineError::malformed(INVALID_FORMAT_MESSAGE))
}

/// Keep ASCII letters and digits only, then prefix `#`.
///
/// An entry with nothing left becomes a bare `#`.
#[must_use]
pub fn normalize_hashtag(raw: &str) -> String {
    let word: String = raw.chars().filter(char::is_ascii_alphanumeric).collect();
    format!("#{word}")
}

/// Normalize every entry, one tag per input in input order.
#[must_use]
pub fn normalize_hashtags(raw: &[String]) -> Vec<String> {
    raw.iter().map(|tag| normalize_hashtag(tag)).collect()
}

/// Turn a response body into the value committed for `kind`.
///
/// # Errors
///
/// `MalformedResponse` when the body has no candidate text, or when a
/// structured kind's text is not a JSON array of strings.
pub fn parse_artifact(kind: ArtifactKind, body: &Value) -> Result<ArtifactValue, RefineError> {
    let text = extract_text(body).ok_or_else(|| RefineError::malformed(INVALID_FORMAT_MESSAGE))?;
    match kind {
        ArtifactKind::Variations => parse_string_list(&text).map(ArtifactValue::List),
        ArtifactKind::Hashtags => {
            parse_string_list(&text).map(|tags| ArtifactValue::List(normalize_hashtags(&tags)))
        }
        ArtifactKind::Story | ArtifactKind::Expansion | ArtifactKind::Translation => {
            Ok(ArtifactValue::Text(text))
        }
    }
}
