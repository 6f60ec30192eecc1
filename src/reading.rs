//! Literal readings and provenance-tagged readings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Separates the base of a reading from its okurigana in the single-string form.
pub const SUFFIX_SEPARATOR: char = '-';

/// A literal reading: the part the character itself covers plus the okurigana
/// written after it (possibly empty).
///
/// Equality and hashing are structural, so this is the key readings from
/// different sources are matched on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReadingValue {
    base: String,
    suffix: String,
}

impl ReadingValue {
    pub fn new(base: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            suffix: suffix.into(),
        }
    }

    /// Parse the `base-suffix` form. Without a separator the suffix is empty.
    pub fn parse(literal: &str) -> Self {
        match literal.split_once(SUFFIX_SEPARATOR) {
            Some((base, suffix)) => Self::new(base, suffix),
            None => Self::new(literal, ""),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn has_suffix(&self) -> bool {
        !self.suffix.is_empty()
    }
}

impl fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_suffix() {
            write!(f, "{}{}{}", self.base, SUFFIX_SEPARATOR, self.suffix)
        } else {
            f.write_str(&self.base)
        }
    }
}

impl Serialize for ReadingValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReadingValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let literal = String::deserialize(deserializer)?;
        Ok(Self::parse(&literal))
    }
}

/// A reading together with the sources that attest it.
///
/// Readings only come out of the two constructors, each of which sets at
/// least one provenance flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading {
    reading: ReadingValue,
    in_document: bool,
    in_reference: bool,
    is_irregular: bool,
}

impl Reading {
    /// A reading found in the page being parsed.
    pub fn from_document(reading: ReadingValue, in_reference: bool, is_irregular: bool) -> Self {
        Self {
            reading,
            in_document: true,
            in_reference,
            is_irregular,
        }
    }

    /// A reading contributed by the reference dataset.
    pub fn from_reference(reading: ReadingValue, in_document: bool) -> Self {
        Self {
            reading,
            in_document,
            in_reference: true,
            is_irregular: false,
        }
    }

    pub fn value(&self) -> &ReadingValue {
        &self.reading
    }

    pub fn attested_in_primary_source(&self) -> bool {
        self.in_document
    }

    pub fn attested_in_reference_source(&self) -> bool {
        self.in_reference
    }

    pub fn is_irregular(&self) -> bool {
        self.is_irregular
    }
}
