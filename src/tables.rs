//! Read-only reference data: image-code lookup tables, the external reading
//! dataset and the pitch-accent table.
//!
//! Everything here is loaded once before parsing starts and only read
//! afterwards, so a single [`ReferenceData`] can be shared across threads.

use crate::config::CollatorConfig;
use crate::error::{CollateError, Result};
use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Readings for one character from the reference dataset, split by class.
///
/// Every key must be present in the source JSON; a missing class fails the
/// load instead of surfacing later as an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingSet {
    pub goon: Vec<String>,
    pub kanon: Vec<String>,
    pub kanyoon: Vec<String>,
    pub toon: Vec<String>,
    pub soon: Vec<String>,
    pub on: Vec<String>,
    pub kun: Vec<String>,
    /// Archaic and name-only readings. Carried for completeness; no entry
    /// field is built from it.
    #[serde(rename = "nanori")]
    pub archaic: Vec<String>,
}

/// Pitch-accent data for one headword.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccentRecord {
    pub reading: String,
    pub accent: Vec<String>,
}

/// Image-code tables used to turn glyph images back into characters.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    headword_images: HashMap<String, String>,
    radical_images: HashMap<String, String>,
    image_exceptions: HashMap<String, String>,
}

impl ReferenceTables {
    pub fn new(
        headword_images: HashMap<String, String>,
        radical_images: HashMap<String, String>,
        image_exceptions: HashMap<String, String>,
    ) -> Self {
        Self {
            headword_images,
            radical_images,
            image_exceptions,
        }
    }

    /// Resolve a `std_` image code. These are named after the character's own
    /// codepoint in hex, except for the handful listed in the exception table.
    pub fn resolve_standard_image(&self, code: &str) -> Result<String> {
        if let Some(character) = self.image_exceptions.get(code) {
            return Ok(character.clone());
        }
        u32::from_str_radix(code, 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or_else(|| {
                CollateError::UnresolvableHeadword(format!("undecodable image code {:?}", code))
            })
    }

    /// Resolve an `nw_` image code, which has no relation to the codepoint.
    pub fn resolve_alternate_image(&self, code: &str) -> Result<String> {
        self.headword_images
            .get(code)
            .cloned()
            .ok_or_else(|| CollateError::LookupMiss {
                table: "headword images",
                key: code.to_string(),
            })
    }

    pub fn radical(&self, code: &str) -> Result<&str> {
        self.radical_images
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| CollateError::LookupMiss {
                table: "radical images",
                key: code.to_string(),
            })
    }
}

/// All reference state the assembler consults.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub tables: ReferenceTables,
    readings: HashMap<String, ReadingSet>,
    accents: HashMap<String, AccentRecord>,
}

impl ReferenceData {
    pub fn new(
        tables: ReferenceTables,
        readings: HashMap<String, ReadingSet>,
        accents: HashMap<String, AccentRecord>,
    ) -> Self {
        Self {
            tables,
            readings,
            accents,
        }
    }

    /// Load every dataset named in the config, validating as it goes.
    pub fn load(config: &CollatorConfig) -> Result<Self> {
        let readings: HashMap<String, ReadingSet> = load_json(&config.kanji_readings)?;
        let accents: HashMap<String, AccentRecord> = load_json(&config.pitch_accents)?;
        let headword_images: HashMap<String, String> = load_json(&config.headword_images)?;
        let radical_images: HashMap<String, String> = load_json(&config.radical_images)?;
        let image_exceptions: HashMap<String, String> = match &config.image_exceptions {
            Some(path) => load_json(path)?,
            None => HashMap::new(),
        };

        require_values(&config.headword_images, &headword_images)?;
        require_values(&config.radical_images, &radical_images)?;
        if let Some(path) = &config.image_exceptions {
            require_values(path, &image_exceptions)?;
        }

        info!(
            "Loaded reference data: {} characters with readings, {} accent records, {} headword images, {} radical images, {} image exceptions",
            readings.len(),
            accents.len(),
            headword_images.len(),
            radical_images.len(),
            image_exceptions.len()
        );

        Ok(Self {
            tables: ReferenceTables::new(headword_images, radical_images, image_exceptions),
            readings,
            accents,
        })
    }

    pub fn reading_set(&self, character: &str) -> Result<&ReadingSet> {
        self.readings
            .get(character)
            .ok_or_else(|| CollateError::LookupMiss {
                table: "kanji readings",
                key: character.to_string(),
            })
    }

    pub fn accent_record(&self, word: &str) -> Option<&AccentRecord> {
        self.accents.get(word)
    }

    /// Accent patterns for a headword; most words have none recorded.
    pub fn pitch_accents(&self, word: &str) -> &[String] {
        self.accent_record(word)
            .map(|record| record.accent.as_slice())
            .unwrap_or(&[])
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|source| CollateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CollateError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Lookup tables map codes to glyphs; an empty glyph is a broken row.
fn require_values(path: &Path, table: &HashMap<String, String>) -> Result<()> {
    match table.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((key, _)) => Err(CollateError::InvalidDataset {
            path: path.to_path_buf(),
            reason: format!("empty value for key {:?}", key),
        }),
        None => Ok(()),
    }
}
