//! Glyph formation (六書-style) classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a character's glyph was formed. Exactly one category applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GlyphOrigin {
    Pictograph {
        description: String,
    },
    Ideograph {
        description: String,
    },
    IdeographicCompound {
        components: Vec<String>,
        description: String,
    },
    /// The first component is the phonetic.
    PhonoSemanticCompound {
        components: Vec<String>,
        description: String,
    },
    /// Free-text explanation taken verbatim from the 新字源 reference.
    Arbitrary {
        explanation: String,
    },
    Unknown,
}

impl GlyphOrigin {
    /// Classify from the explanation paragraph that follows the 新字源 link,
    /// if the page has one.
    pub fn from_explanation(explanation: Option<&str>) -> Self {
        match explanation.map(str::trim) {
            Some(text) if !text.is_empty() => GlyphOrigin::Arbitrary {
                explanation: text.to_string(),
            },
            _ => GlyphOrigin::Unknown,
        }
    }
}

impl fmt::Display for GlyphOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlyphOrigin::Pictograph { description } => write!(f, "象形 {}", description),
            GlyphOrigin::Ideograph { description } => write!(f, "指事 {}", description),
            GlyphOrigin::IdeographicCompound { components, .. } => {
                write!(f, "会意 {}", components.join("＋"))
            }
            GlyphOrigin::PhonoSemanticCompound { components, .. } => match components.split_first() {
                Some((phonetic, rest)) => write!(f, "形声 音符{} ＋ {}", phonetic, rest.join("＋")),
                None => f.write_str("形声"),
            },
            GlyphOrigin::Arbitrary { explanation } => f.write_str(explanation),
            GlyphOrigin::Unknown => f.write_str("説明無し"),
        }
    }
}
