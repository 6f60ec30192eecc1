//! Batch-parallel assembly using std::thread.
//!
//! Pages of the requested kind are split into one contiguous chunk per
//! thread. Chunk results are joined back in chunk order, so the output is
//! identical to the sequential iterator's.

use crate::assemble::Assemble;
use crate::batch::{assemble_document, Document};
use crate::error::DocumentError;
use crate::tables::ReferenceData;
use std::panic;
use std::thread::{self, ScopedJoinHandle};

/// Configuration for parallel processing
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Number of threads to use
    pub num_threads: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        let cpus = thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4);
        Self { num_threads: cpus }
    }
}

impl ParallelConfig {
    /// `0` means auto-detect.
    pub fn with_threads(num_threads: usize) -> Self {
        if num_threads == 0 {
            Self::default()
        } else {
            Self { num_threads }
        }
    }
}

/// Assemble every page of `T`'s kind across worker threads.
///
/// A panic in a worker is re-raised on the calling thread.
pub fn assemble_parallel<T: Assemble>(
    documents: &[Document],
    data: &ReferenceData,
    config: &ParallelConfig,
) -> Vec<Result<T, DocumentError>> {
    let documents: Vec<&Document> = documents
        .iter()
        .filter(|document| document.kind == T::KIND)
        .collect();
    if documents.is_empty() {
        return vec![];
    }

    let num_threads = config.num_threads.min(documents.len()).max(1);
    let chunk_size = documents.len().div_ceil(num_threads);

    thread::scope(|scope| {
        let handles: Vec<ScopedJoinHandle<'_, Vec<Result<T, DocumentError>>>> = documents
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|document| assemble_document(document, data))
                        .collect()
                })
            })
            .collect();

        // Collect results preserving order
        let mut results = Vec::with_capacity(documents.len());
        for handle in handles {
            match handle.join() {
                Ok(chunk_results) => results.extend(chunk_results),
                Err(payload) => panic::resume_unwind(payload),
            }
        }
        results
    })
}
