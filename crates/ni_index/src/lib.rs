use std::sync::Arc;

use ni_core::{ArticleRecord, DocumentStore, Error, IndexDocument, Result};
use tracing::{debug, info};

pub mod backends;

pub use backends::MemoryStore;

#[cfg(feature = "qdrant")]
pub use backends::QdrantStore;

/// Result of one article-level write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// All applicable documents were indexed.
    Indexed(usize),
    /// The URL was already in the store; nothing was written.
    AlreadyPresent,
}

/// Deduplicated multi-document writer. One article either short-circuits
/// on its URL or has its documents written in the order given.
pub struct IndexWriter {
    store: Arc<dyn DocumentStore>,
}

impl IndexWriter {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Re-checks `exists` before writing, then indexes the documents in
    /// order. A failure mid-sequence surfaces as a store error for this
    /// article; documents already written stay in place (no rollback).
    pub async fn write(
        &self,
        record: &ArticleRecord,
        documents: &[IndexDocument],
    ) -> Result<WriteOutcome> {
        if self.store.exists(&record.url).await? {
            debug!(url = %record.url, "article already present");
            return Ok(WriteOutcome::AlreadyPresent);
        }

        let mut written = 0usize;
        for document in documents {
            self.store.index_document(document).await.map_err(|e| {
                Error::Store(format!(
                    "wrote {}/{} documents for {}: {}",
                    written,
                    documents.len(),
                    record.url,
                    e
                ))
            })?;
            written += 1;
        }

        info!(url = %record.url, documents = written, "article indexed");
        Ok(WriteOutcome::Indexed(written))
    }
}
