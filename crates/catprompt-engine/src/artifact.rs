use serde::{Deserialize, Serialize};

/// The five artifacts derived from an active prompt.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum ArtifactKind {
    #[strum(to_string = "variations", serialize = "variation")]
    Variations,
    #[strum(to_string = "story")]
    Story,
    #[strum(to_string = "expansion", serialize = "expand")]
    Expansion,
    #[strum(to_string = "hashtags", serialize = "tags")]
    Hashtags,
    #[strum(to_string = "translation", serialize = "translate")]
    Translation,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Variations,
        ArtifactKind::Story,
        ArtifactKind::Expansion,
        ArtifactKind::Hashtags,
        ArtifactKind::Translation,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Variations => 0,
            Self::Story => 1,
            Self::Expansion => 2,
            Self::Hashtags => 3,
            Self::Translation => 4,
        }
    }

    /// Whether the response is a JSON array of strings rather than free text.
    #[must_use]
    pub fn is_structured(self) -> bool {
        matches!(self, Self::Variations | Self::Hashtags)
    }

    /// Separator used when a list artifact is flattened to text.
    #[must_use]
    pub fn list_separator(self) -> &'static str {
        match self {
            Self::Hashtags => " ",
            _ => "\n",
        }
    }
}

/// Committed value of an artifact slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArtifactValue {
    Text(String),
    List(Vec<String>),
}

impl ArtifactValue {
    /// Flatten to a single string, joining list items with `separator`.
    #[must_use]
    pub fn to_text(&self, separator: &str) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::List(items) => items.join(separator),
        }
    }
}
