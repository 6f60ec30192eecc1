//! Parsing and reconciliation of Kanjipedia character and word pages into
//! Kanken entry records.
//!
//! A page goes through field extraction ([`extract`]), reading
//! reconciliation against the reference dataset ([`reconcile`]) and meaning
//! segmentation ([`meaning`]); [`assemble`] composes the results and
//! [`batch`] runs a whole page collection, reporting failures per page.

pub mod assemble;
pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod level;
pub mod meaning;
pub mod model;
pub mod origin;
pub mod parallel;
pub mod reading;
pub mod reconcile;
pub mod tables;

#[cfg(test)]
mod fixtures;

pub use assemble::{assemble_character_entry, assemble_word_entry, Assemble};
pub use batch::{Batch, BatchReport, Document, DocumentKind};
pub use config::{find_config_file, CollatorConfig};
pub use error::{CollateError, DocumentError, Result};
pub use export::ToTsvRow;
pub use level::KankenLevel;
pub use meaning::MeaningSense;
pub use model::{CharacterEntry, CharacterTable, WordEntry};
pub use origin::GlyphOrigin;
pub use parallel::{assemble_parallel, ParallelConfig};
pub use reading::{Reading, ReadingValue};
pub use tables::{ReferenceData, ReferenceTables};
