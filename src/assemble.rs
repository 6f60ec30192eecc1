//! Composition of extracted fields, reconciled readings and segmented
//! meanings into entry records.

use crate::batch::DocumentKind;
use crate::error::Result;
use crate::extract::{extract_character_fields, extract_word_fields};
use crate::meaning;
use crate::model::{CharacterEntry, CharacterTable, WordEntry};
use crate::reconcile::{reconcile, reconcile_by_containment};
use crate::tables::ReferenceData;
use log::debug;

/// An entry type that can be assembled from one page.
pub trait Assemble: Sized + Send {
    /// The kind of page this entry is built from.
    const KIND: DocumentKind;

    fn assemble(markup: &str, data: &ReferenceData) -> Result<Self>;

    /// The single field the entry's identity derives from.
    fn identity(&self) -> &str;
}

impl Assemble for CharacterEntry {
    const KIND: DocumentKind = DocumentKind::Character;

    fn assemble(markup: &str, data: &ReferenceData) -> Result<Self> {
        assemble_character_entry(markup, data)
    }

    fn identity(&self) -> &str {
        CharacterEntry::identity(self)
    }
}

impl Assemble for WordEntry {
    const KIND: DocumentKind = DocumentKind::Word;

    fn assemble(markup: &str, data: &ReferenceData) -> Result<Self> {
        assemble_word_entry(markup, data)
    }

    fn identity(&self) -> &str {
        WordEntry::identity(self)
    }
}

pub fn assemble_character_entry(markup: &str, data: &ReferenceData) -> Result<CharacterEntry> {
    let fields = extract_character_fields(markup, &data.tables)?;
    let reference = data.reading_set(&fields.character)?;

    Ok(CharacterEntry {
        level: fields.level,
        is_national_coinage: fields.is_national_coinage,
        meanings: meaning::segment(&fields.meaning_block),
        on_readings: reconcile(&fields.on_block, &reference.on),
        goon: reconcile_by_containment(&fields.on_block, &reference.goon),
        kanon: reconcile_by_containment(&fields.on_block, &reference.kanon),
        kanyoon: reconcile_by_containment(&fields.on_block, &reference.kanyoon),
        toon: reconcile_by_containment(&fields.on_block, &reference.toon),
        soon: reconcile_by_containment(&fields.on_block, &reference.soon),
        kun_readings: reconcile(&fields.kun_block, &reference.kun),
        radical: fields.radical,
        stroke_count: fields.stroke_count,
        radical_stroke_count: fields.radical_stroke_count,
        glyph_origin: fields.glyph_origin,
        supersedes: Vec::new(),
        superseded_by: Vec::new(),
        character: fields.character,
    })
}

pub fn assemble_word_entry(markup: &str, data: &ReferenceData) -> Result<WordEntry> {
    let fields = extract_word_fields(markup, &data.tables)?;
    let pitch_accent_patterns = match data.accent_record(&fields.word) {
        Some(record) => {
            if record.reading != fields.reading {
                debug!(
                    "Accent record for {} is read {}, page reads {}",
                    fields.word, record.reading, fields.reading
                );
            }
            record.accent.clone()
        }
        None => Vec::new(),
    };

    Ok(WordEntry {
        word: fields.word,
        reading: fields.reading,
        pitch_accent_patterns,
        meaning: fields.meaning_block,
        is_irregular_reading: fields.is_irregular_reading,
        constituents: CharacterTable::new(),
    })
}
