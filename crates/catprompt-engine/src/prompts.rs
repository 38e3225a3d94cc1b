//! Instruction text sent to the generative API for each operation.

use crate::artifact::ArtifactKind;

/// Instruction for a fresh base prompt.
pub const BASE_PROMPT_INSTRUCTION: &str = "Write one creative, highly detailed prompt for an AI \
image generator that depicts a cat. Describe the cat, its surroundings, the lighting and the \
artistic style in a single paragraph. Respond with the prompt text only.";

/// Per-session knobs that shape derived instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionSettings {
    pub variation_count: u32,
    pub translation_language: String,
}

impl Default for InstructionSettings {
    fn default() -> Self {
        Self {
            variation_count: catprompt_config::DEFAULT_VARIATION_COUNT,
            translation_language: catprompt_config::DEFAULT_TRANSLATION_LANGUAGE
                .to_string(),
        }
    }
}

/// Instruction deriving `kind` from `prompt`. The prompt is embedded verbatim.
#[must_use]
pub fn instruction_for(kind: ArtifactKind, prompt: &str, settings: &InstructionSettings) -> String {
    match kind {
        ArtifactKind::Variations => format!(
            "Create {count} distinct variations of the following image prompt. Keep a cat as \
             the subject but change the setting, mood or artistic style of each one. Return a \
             JSON array of {count} strings.\n\nPrompt: \"{prompt}\"",
            count = settings.variation_count,
        ),
        ArtifactKind::Story => format!(
            "Write a short, whimsical story of no more than 150 words about the cat described \
             in this image prompt.\n\nPrompt: \"{prompt}\""
        ),
        ArtifactKind::Expansion => format!(
            "Expand the following image prompt into a richer version with specific details \
             about composition, lighting, color palette and texture. Respond with the expanded \
             prompt only.\n\nPrompt: \"{prompt}\""
        ),
        ArtifactKind::Hashtags => format!(
            "Suggest between 5 and 10 social media hashtags for an image generated from the \
             following prompt. Return a JSON array of single words without the # symbol.\n\n\
             Prompt: \"{prompt}\""
        ),
        ArtifactKind::Translation => format!(
            "Translate the following image prompt into {language}. Respond with the \
             translation only.\n\nPrompt: \"{prompt}\"",
            language = settings.translation_language,
        ),
    }
}
