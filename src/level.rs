//! The twelve-level Kanken proficiency scale.

use crate::error::{CollateError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;

/// Kanken level, ordered from easiest (level 10) to hardest (level 1).
///
/// The discriminant is the ordinal: `Ten` is 1, `One` is 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KankenLevel {
    #[serde(rename = "10")]
    Ten = 1,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "準2")]
    PreTwo,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "準1")]
    PreOne,
    #[serde(rename = "1")]
    One,
}

impl KankenLevel {
    pub const ALL: [KankenLevel; 12] = [
        KankenLevel::Ten,
        KankenLevel::Nine,
        KankenLevel::Eight,
        KankenLevel::Seven,
        KankenLevel::Six,
        KankenLevel::Five,
        KankenLevel::Four,
        KankenLevel::Three,
        KankenLevel::PreTwo,
        KankenLevel::Two,
        KankenLevel::PreOne,
        KankenLevel::One,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// The label as printed on the level badge, without the trailing 級.
    pub fn label(self) -> &'static str {
        match self {
            KankenLevel::Ten => "10",
            KankenLevel::Nine => "9",
            KankenLevel::Eight => "8",
            KankenLevel::Seven => "7",
            KankenLevel::Six => "6",
            KankenLevel::Five => "5",
            KankenLevel::Four => "4",
            KankenLevel::Three => "3",
            KankenLevel::PreTwo => "準2",
            KankenLevel::Two => "2",
            KankenLevel::PreOne => "準1",
            KankenLevel::One => "1",
        }
    }

    /// Levels up to and including 2 cover the jōyō kanji.
    pub fn is_jouyou(self) -> bool {
        self <= KankenLevel::Two
    }

    /// Levels up to and including 5 cover the kyōiku kanji.
    pub fn is_kyouiku(self) -> bool {
        self <= KankenLevel::Five
    }
}

impl FromStr for KankenLevel {
    type Err = CollateError;

    /// Accepts both half-width and full-width digits ("１０" and "10").
    fn from_str(label: &str) -> Result<Self> {
        let normalized: String = label.trim().nfkc().collect();
        let normalized = normalized.trim_end_matches('級');
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.label() == normalized)
            .ok_or_else(|| CollateError::UnknownLevel(label.to_string()))
    }
}

impl fmt::Display for KankenLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
