use std::fmt;

use async_trait::async_trait;
use ni_core::{Embedder, Error, Result};

use crate::l2_normalize;

const DIMENSION: usize = 384;

/// Deterministic stand-in embedder for tests and dry runs: byte
/// frequencies folded into a fixed number of buckets, then normalized.
pub struct DummyEmbedder;

impl DummyEmbedder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DummyEmbedder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyEmbedder").finish()
    }
}

#[async_trait]
impl Embedder for DummyEmbedder {
    fn name(&self) -> &str {
        "dummy"
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(Error::Embedding("empty input".to_string()));
        }

        let mut embedding = vec![0.0; DIMENSION];
        embedding[0] = text.len() as f32 / 1000.0;
        for byte in text.bytes() {
            embedding[1 + (byte as usize % (DIMENSION - 1))] += 1.0;
        }

        l2_normalize(&mut embedding);
        Ok(embedding)
    }
}
