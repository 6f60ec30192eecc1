//! The assembled entry records.

use crate::level::KankenLevel;
use crate::meaning::MeaningSense;
use crate::origin::GlyphOrigin;
use crate::reading::Reading;
use serde::Serialize;
use std::collections::BTreeMap;

/// Character entries keyed by character.
pub type CharacterTable = BTreeMap<String, CharacterEntry>;

/// One character page, fully reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterEntry {
    pub character: String,
    pub level: KankenLevel,
    pub is_national_coinage: bool,
    pub meanings: Vec<MeaningSense>,
    pub on_readings: Vec<Reading>,
    pub goon: Vec<Reading>,
    pub kanon: Vec<Reading>,
    pub kanyoon: Vec<Reading>,
    pub toon: Vec<Reading>,
    pub soon: Vec<Reading>,
    pub kun_readings: Vec<Reading>,
    pub radical: String,
    pub stroke_count: u32,
    pub radical_stroke_count: u32,
    pub glyph_origin: GlyphOrigin,
    /// Reserved for variant/simplified cross-references; always empty.
    pub supersedes: Vec<String>,
    pub superseded_by: Vec<String>,
}

impl CharacterEntry {
    pub fn identity(&self) -> &str {
        &self.character
    }
}

/// One word page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordEntry {
    pub word: String,
    pub reading: String,
    pub pitch_accent_patterns: Vec<String>,
    pub meaning: String,
    /// The reading cannot be decomposed into the readings of its characters
    /// (ateji and jukujikun).
    pub is_irregular_reading: bool,
    /// Not yet populated.
    pub constituents: CharacterTable,
}

impl WordEntry {
    /// Not unique: two pages can share a spelling with different readings.
    pub fn identity(&self) -> &str {
        &self.word
    }
}
