//! Error types for document assembly and reference-data loading.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while loading reference data or assembling
/// a single document into an entry.
///
/// The first four variants are per-document failures: the batch driver
/// records them against the offending document and carries on.
#[derive(Debug, Error)]
pub enum CollateError {
    /// Neither headword text nor a decodable headword image was present.
    #[error("headword could not be resolved: {0}")]
    UnresolvableHeadword(String),

    /// The level badge carried a label outside the twelve-level scale.
    #[error("unknown level label {0:?}")]
    UnknownLevel(String),

    /// A structural field the page layout always carries was absent.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A reference table has no entry for the key found in the document.
    #[error("no entry for {key:?} in {table}")]
    LookupMiss { table: &'static str, key: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A dataset parsed but failed validation.
    #[error("invalid dataset {}: {reason}", path.display())]
    InvalidDataset { path: PathBuf, reason: String },

    #[error("could not find {0}; use --config to specify a path")]
    ConfigNotFound(String),
}

/// A convenience `Result` alias using [`CollateError`].
pub type Result<T> = std::result::Result<T, CollateError>;

/// A per-document failure, attributed to the document that caused it.
#[derive(Debug, Error)]
#[error("document {document_id}: {source}")]
pub struct DocumentError {
    pub document_id: String,
    #[source]
    pub source: CollateError,
}

impl DocumentError {
    pub fn new(document_id: impl Into<String>, source: CollateError) -> Self {
        Self {
            document_id: document_id.into(),
            source,
        }
    }
}
