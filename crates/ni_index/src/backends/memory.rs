use std::sync::Arc;

use async_trait::async_trait;
use ni_core::{DocumentStore, IndexDocument, Result};
use tokio::sync::RwLock;

/// In-process store used by tests and dry runs. Keeps documents in insert
/// order so callers can observe exactly what a crawl produced.
#[derive(Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<Vec<IndexDocument>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn documents(&self) -> Vec<IndexDocument> {
        self.documents.read().await.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn exists(&self, url: &str) -> Result<bool> {
        let documents = self.documents.read().await;
        Ok(documents.iter().any(|d| d.metadata.url == url))
    }

    async fn index_document(&self, document: &IndexDocument) -> Result<()> {
        let mut documents = self.documents.write().await;
        documents.push(document.clone());
        Ok(())
    }
}
