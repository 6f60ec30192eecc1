//! Iteration over a collection of pages, one entry or failure per page.

use crate::assemble::Assemble;
use crate::error::{CollateError, DocumentError, Result};
use crate::extract::extract_four_character_headword;
use crate::model::{CharacterEntry, WordEntry};
use crate::tables::ReferenceData;
use log::{debug, info, warn};
use std::fs;
use std::marker::PhantomData;
use std::path::Path;
use std::slice;

/// Which entry type a page describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Character,
    Word,
}

/// One raw page, as handed over by the fetch/cache side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub kind: DocumentKind,
    pub markup: String,
}

impl Document {
    pub fn new(id: impl Into<String>, kind: DocumentKind, markup: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            markup: markup.into(),
        }
    }

    /// Load every `*.html` file in `dir`, sorted by file name. The file stem
    /// becomes the document id.
    pub fn load_dir(dir: &Path, kind: DocumentKind) -> Result<Vec<Document>> {
        let io_error = |source: std::io::Error| CollateError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for item in fs::read_dir(dir).map_err(io_error)? {
            let path = item.map_err(io_error)?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("html") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let markup = fs::read_to_string(&path).map_err(|source| CollateError::Io {
                path: path.clone(),
                source,
            })?;
            let id = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            documents.push(Document::new(id, kind, markup));
        }

        info!("Loaded {} documents from {}", documents.len(), dir.display());
        Ok(documents)
    }
}

/// Assemble one page, attributing any failure to it.
pub fn assemble_document<T: Assemble>(
    document: &Document,
    data: &ReferenceData,
) -> std::result::Result<T, DocumentError> {
    match T::assemble(&document.markup, data) {
        Ok(entry) => {
            debug!("Assembled {} from document {}", entry.identity(), document.id);
            Ok(entry)
        }
        Err(source) => {
            warn!("Skipping document {}: {}", document.id, source);
            Err(DocumentError::new(document.id.clone(), source))
        }
    }
}

/// A document collection paired with the reference data to assemble it
/// against.
///
/// Iterators borrow the collection, so every call starts again from the
/// first document.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    documents: &'a [Document],
    data: &'a ReferenceData,
}

impl<'a> Batch<'a> {
    pub fn new(documents: &'a [Document], data: &'a ReferenceData) -> Self {
        Self { documents, data }
    }

    pub fn characters(&self) -> Entries<'a, CharacterEntry> {
        self.entries()
    }

    pub fn words(&self) -> Entries<'a, WordEntry> {
        self.entries()
    }

    /// Entries of type `T`, skipping pages of the other kind.
    pub fn entries<T: Assemble>(&self) -> Entries<'a, T> {
        Entries {
            documents: self.documents.iter(),
            data: self.data,
            entry: PhantomData,
        }
    }

    /// The four-character idiom heading each word page. Pages headed by
    /// anything shorter are reported as failures.
    pub fn four_character_headwords(
        &self,
    ) -> impl Iterator<Item = std::result::Result<String, DocumentError>> + 'a {
        let (documents, data) = (self.documents, self.data);
        documents
            .iter()
            .filter(|document| document.kind == DocumentKind::Word)
            .map(move |document| {
                extract_four_character_headword(&document.markup, &data.tables).map_err(|source| {
                    warn!("Skipping document {}: {}", document.id, source);
                    DocumentError::new(document.id.clone(), source)
                })
            })
    }
}

/// Lazy per-page assembly. Yields in input order.
pub struct Entries<'a, T> {
    documents: slice::Iter<'a, Document>,
    data: &'a ReferenceData,
    entry: PhantomData<fn() -> T>,
}

impl<'a, T: Assemble> Iterator for Entries<'a, T> {
    type Item = std::result::Result<T, DocumentError>;

    fn next(&mut self) -> Option<Self::Item> {
        let document = self.documents.find(|document| document.kind == T::KIND)?;
        Some(assemble_document(document, self.data))
    }
}

/// Successes in input order plus every failure.
#[derive(Debug)]
pub struct BatchReport<T> {
    pub entries: Vec<T>,
    pub failures: Vec<DocumentError>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub fn succeeded(&self) -> usize {
        self.entries.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn push(&mut self, result: std::result::Result<T, DocumentError>) {
        match result {
            Ok(entry) => self.entries.push(entry),
            Err(error) => self.failures.push(error),
        }
    }
}

impl<T> FromIterator<std::result::Result<T, DocumentError>> for BatchReport<T> {
    fn from_iter<I: IntoIterator<Item = std::result::Result<T, DocumentError>>>(iter: I) -> Self {
        let mut report = BatchReport::default();
        for result in iter {
            report.push(result);
        }
        report
    }
}
