//! generateContent request bodies.
//!
//! The relay forwards these verbatim, so this is the only place that knows
//! the request side of the Gemini wire format.

use serde::Serialize;
use serde_json::Value;

use crate::artifact::ArtifactKind;
use crate::error::RefineError;
use crate::prompts::{self, InstructionSettings};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Schema,
}

#[derive(Debug, Serialize)]
struct Schema {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Box<Schema>>,
}

impl GenerateContentRequest {
    fn new(instruction: String) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: instruction }],
            }],
            generation_config: None,
        }
    }

    /// Constrain the response to a JSON array of strings.
    fn string_array(mut self) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_mime_type: "application/json",
            response_schema: Schema {
                kind: "ARRAY",
                items: Some(Box::new(Schema {
                    kind: "STRING",
                    items: None,
                })),
            },
        });
        self
    }

    fn into_value(self) -> Result<Value, RefineError> {
        serde_json::to_value(self).map_err(|e| RefineError::Transport {
            message: format!("Failed to encode request: {e}"),
        })
    }
}

/// Payload asking for a fresh base prompt as free text.
pub fn base_prompt_payload() -> Result<Value, RefineError> {
    GenerateContentRequest::new(prompts::BASE_PROMPT_INSTRUCTION.to_string()).into_value()
}

/// Payload deriving `kind` from `prompt`.
///
/// Variations and hashtags request a structured array-of-strings response;
/// the rest request free text.
pub fn refinement_payload(
    kind: ArtifactKind,
    prompt: &str,
    settings: &InstructionSettings,
) -> Result<Value, RefineError> {
    let request = GenerateContentRequest::new(prompts::instruction_for(kind, prompt, settings));
    if kind.is_structured() {
        request.string_array().into_value()
    } else {
        request.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_payload_is_plain_text_request() {
        let payload = base_prompt_payload().unwrap();
        assert_eq!(payload["contents"][0]["role"], "user");
        assert_eq!(
            payload["contents"][0]["parts"][0]["text"],
            prompts::BASE_PROMPT_INSTRUCTION
        );
        assert!(payload.get("generationConfig").is_none());
    }

    #[test]
    fn test_structured_kinds_request_string_array() {
        let settings = InstructionSettings::default();
        for kind in [ArtifactKind::Variations, ArtifactKind::Hashtags] {
            let payload = refinement_payload(kind, "A cat", &settings).unwrap();
            assert_eq!(
                payload["generationConfig"],
                json!({
                    "responseMimeType": "application/json",
                    "responseSchema": {"type": "ARRAY", "items": {"type": "STRING"}}
                })
            );
        }
    }

    #[test]
    fn test_text_kinds_have_no_generation_config() {
        let settings = InstructionSettings::default();
        for kind in [
            ArtifactKind::Story,
            ArtifactKind::Expansion,
            ArtifactKind::Translation,
        ] {
            let payload = refinement_payload(kind, "A cat", &settings).unwrap();
            assert!(payload.get("generationConfig").is_none(), "{kind}");
            let text = payload["contents"][0]["parts"][0]["text"].as_str().unwrap();
            assert!(text.contains("A cat"));
        }
    }
}
