//! Merging a page's own reading list with the reference reading dataset.

use crate::extract::fragment_text;
use crate::reading::{Reading, ReadingValue};
use scraper::{ElementRef, Html};
use unicode_normalization::UnicodeNormalization;

/// Separates readings within a block.
pub const READING_DELIMITER: char = '、';

/// Prefixes a reading marked as non-standard on the page.
pub const IRREGULAR_MARKER: char = '▲';

/// A reading as it appears in the page, before provenance is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReading {
    pub value: ReadingValue,
    pub is_irregular: bool,
}

/// Split a raw reading block into its readings, in page order.
///
/// The block is walked as parsed markup, so entities are decoded before
/// delimiters are looked for. Line breaks count as delimiters, each `▲`
/// starts a new reading even when the page omits the delimiter before it,
/// and text inside a `<span>` is the okurigana.
pub fn parse_reading_block(block: &str) -> Vec<DocumentReading> {
    let fragment = Html::parse_fragment(block);
    let mut tokens = Tokenizer::default();
    tokens.walk(fragment.root_element(), false);
    tokens.finish();
    tokens.readings
}

#[derive(Default)]
struct Tokenizer {
    readings: Vec<DocumentReading>,
    base: String,
    suffix: String,
    is_irregular: bool,
}

impl Tokenizer {
    fn walk(&mut self, element: ElementRef<'_>, in_suffix: bool) {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                self.push_text(text, in_suffix);
            } else if let Some(child) = ElementRef::wrap(child) {
                match child.value().name() {
                    "br" => self.finish(),
                    "span" => self.walk(child, true),
                    _ => self.walk(child, in_suffix),
                }
            }
        }
    }

    fn push_text(&mut self, text: &str, in_suffix: bool) {
        for c in text.chars() {
            match c {
                READING_DELIMITER => self.finish(),
                IRREGULAR_MARKER => {
                    self.finish();
                    self.is_irregular = true;
                }
                _ if in_suffix => self.suffix.push(c),
                _ => self.base.push(c),
            }
        }
    }

    fn finish(&mut self) {
        let base = normalize(&std::mem::take(&mut self.base));
        let suffix = normalize(&std::mem::take(&mut self.suffix));
        let is_irregular = std::mem::take(&mut self.is_irregular);
        if base.is_empty() && suffix.is_empty() {
            return;
        }
        self.readings.push(DocumentReading {
            value: ReadingValue::new(base, suffix),
            is_irregular,
        });
    }
}

fn normalize(text: &str) -> String {
    text.trim().nfc().collect()
}

/// Reference readings as values, first occurrence of each literal form only.
fn reference_values<S: AsRef<str>>(reference: &[S]) -> Vec<ReadingValue> {
    let mut values: Vec<ReadingValue> = Vec::with_capacity(reference.len());
    for literal in reference {
        let normalized = normalize(literal.as_ref());
        if normalized.is_empty() {
            continue;
        }
        let value = ReadingValue::parse(&normalized);
        if !values.contains(&value) {
            values.push(value);
        }
    }
    values
}

/// Full reconciliation: every reading from the page, then every reference
/// reading the page did not produce.
///
/// Page readings keep their page order and are not de-duplicated. Nothing
/// from either source is dropped.
pub fn reconcile<S: AsRef<str>>(document_block: &str, reference: &[S]) -> Vec<Reading> {
    let reference = reference_values(reference);
    let document = parse_reading_block(document_block);

    let mut readings: Vec<Reading> = Vec::with_capacity(document.len() + reference.len());
    for parsed in &document {
        let in_reference = reference.contains(&parsed.value);
        readings.push(Reading::from_document(
            parsed.value.clone(),
            in_reference,
            parsed.is_irregular,
        ));
    }

    for value in reference {
        if !document.iter().any(|parsed| parsed.value == value) {
            readings.push(Reading::from_reference(value, false));
        }
    }
    readings
}

/// Containment check used for the historical on'yomi layers, which the page
/// does not break out.
///
/// One reading per reference reading; the primary flag only records whether
/// the block's text (tags dropped, entities decoded) contains the literal.
pub fn reconcile_by_containment<S: AsRef<str>>(document_block: &str, reference: &[S]) -> Vec<Reading> {
    let block_text: String = fragment_text(document_block).nfc().collect();
    reference_values(reference)
        .into_iter()
        .map(|value| {
            let in_document = block_text.contains(value.to_string().as_str());
            Reading::from_reference(value, in_document)
        })
        .collect()
}
