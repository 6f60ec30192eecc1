//! Flat-text rendering of entries: one tab-separated row per entry.

use crate::extract::LINE_BREAK;
use crate::meaning::{subsense_marker, MeaningSense};
use crate::model::{CharacterEntry, WordEntry};
use crate::reading::Reading;
use crate::reconcile::IRREGULAR_MARKER;

const READING_SEPARATOR: &str = "; ";
const ACCENT_SEPARATOR: &str = ",";

/// Render senses as qualifier plus circled-number sub-senses, one sense per
/// line break.
pub fn render_meanings(senses: &[MeaningSense]) -> String {
    senses
        .iter()
        .map(render_sense)
        .collect::<Vec<_>>()
        .join(LINE_BREAK)
}

fn render_sense(sense: &MeaningSense) -> String {
    let mut rendered = sense.qualifier.clone();
    for (i, subsense) in sense.subsenses.iter().enumerate() {
        // beyond ⑳ there is no marker; fall back to plain numbering
        match subsense_marker(i + 1) {
            Some(marker) => rendered.push(marker),
            None => rendered.push_str(&format!("({})", i + 1)),
        }
        rendered.push_str(subsense);
    }
    rendered
}

pub fn render_readings(readings: &[Reading]) -> String {
    readings
        .iter()
        .map(|reading| {
            if reading.is_irregular() {
                format!("{}{}", IRREGULAR_MARKER, reading.value())
            } else {
                reading.value().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(READING_SEPARATOR)
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Tabs and newlines would break the row structure.
fn field(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

fn row(fields: Vec<String>) -> String {
    fields.iter().map(|f| field(f)).collect::<Vec<_>>().join("\t")
}

pub fn character_row(entry: &CharacterEntry) -> String {
    row(vec![
        entry.character.clone(),
        entry.level.label().to_string(),
        flag(entry.is_national_coinage).to_string(),
        render_meanings(&entry.meanings),
        render_readings(&entry.on_readings),
        render_readings(&entry.goon),
        render_readings(&entry.kanon),
        render_readings(&entry.kanyoon),
        render_readings(&entry.toon),
        render_readings(&entry.soon),
        render_readings(&entry.kun_readings),
        entry.radical.clone(),
        entry.stroke_count.to_string(),
        entry.radical_stroke_count.to_string(),
        entry.glyph_origin.to_string(),
    ])
}

pub fn word_row(entry: &WordEntry) -> String {
    row(vec![
        entry.word.clone(),
        entry.reading.clone(),
        entry.pitch_accent_patterns.join(ACCENT_SEPARATOR),
        entry.meaning.clone(),
        flag(entry.is_irregular_reading).to_string(),
    ])
}

/// Entry types with a flat-text row form.
pub trait ToTsvRow {
    fn to_tsv_row(&self) -> String;
}

impl ToTsvRow for CharacterEntry {
    fn to_tsv_row(&self) -> String {
        character_row(self)
    }
}

impl ToTsvRow for WordEntry {
    fn to_tsv_row(&self) -> String {
        word_row(self)
    }
}

/// Bare headword lists, one per row.
impl ToTsvRow for String {
    fn to_tsv_row(&self) -> String {
        field(self)
    }
}
