//! Segmentation of definition text into major senses and numbered sub-senses.
//!
//! Definitions mark major senses with circled ideographic numerals (㊀–㊄)
//! and sub-senses with circled digits (①–⑳). Either level may be absent, in
//! which case a single implicit marker is assumed.

use crate::extract::LINE_BREAK;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub const MAJOR_SENSE_MARKERS: [char; 5] = ['㊀', '㊁', '㊂', '㊃', '㊄'];

/// One major sense: a free-text qualifier followed by its numbered sub-senses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeaningSense {
    pub qualifier: String,
    pub subsenses: Vec<String>,
}

pub fn is_major_marker(c: char) -> bool {
    MAJOR_SENSE_MARKERS.contains(&c)
}

/// ① (U+2460) through ⑳ (U+2473).
pub fn is_subsense_marker(c: char) -> bool {
    ('\u{2460}'..='\u{2473}').contains(&c)
}

/// The marker for the `n`th sub-sense (1-based), if one exists.
pub fn subsense_marker(n: usize) -> Option<char> {
    let offset = u32::try_from(n.checked_sub(1)?).ok()?;
    if offset > 19 {
        return None;
    }
    char::from_u32(0x2460 + offset)
}

/// Split a raw meaning block into its ordered senses.
///
/// Text before the first major marker repeats the headword and is dropped.
/// Always returns at least one sense, and every sense has at least one
/// sub-sense (possibly empty when the segment holds only a qualifier followed
/// by a bare marker).
pub fn segment(raw: &str) -> Vec<MeaningSense> {
    let raw: Cow<str> = if raw.contains(is_major_marker) {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(format!("{}{}", MAJOR_SENSE_MARKERS[0], raw))
    };

    raw.split(is_major_marker).skip(1).map(parse_sense).collect()
}

fn parse_sense(segment: &str) -> MeaningSense {
    let segment: Cow<str> = if segment.contains(is_subsense_marker) {
        Cow::Borrowed(segment)
    } else {
        Cow::Owned(format!("①{}", segment))
    };

    let mut pieces = segment.split(is_subsense_marker);
    let qualifier = pieces.next().map(clean_piece).unwrap_or_default();
    let subsenses = pieces.map(clean_piece).collect();

    MeaningSense {
        qualifier,
        subsenses,
    }
}

/// Trim whitespace and any line-break markers left over at either end.
fn clean_piece(piece: &str) -> String {
    let mut piece = piece.trim();
    loop {
        let stripped = piece
            .strip_prefix(LINE_BREAK)
            .or_else(|| piece.strip_suffix(LINE_BREAK));
        match stripped {
            Some(rest) => piece = rest.trim(),
            None => return piece.to_string(),
        }
    }
}
