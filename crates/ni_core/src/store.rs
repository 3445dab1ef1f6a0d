use crate::types::IndexDocument;
use crate::Result;
use async_trait::async_trait;

/// A search/vector store addressed by a fixed collection name.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Keyword-exact match on `metadata.url`. Any hit means the article
    /// has already been ingested.
    async fn exists(&self, url: &str) -> Result<bool>;

    /// Index a single document. Writes are independent in the underlying
    /// store; there is no multi-document transaction.
    async fn index_document(&self, document: &IndexDocument) -> Result<()>;
}
