use crate::Result;
use async_trait::async_trait;

/// Maps a text unit to a fixed-dimension, L2-normalized vector.
/// Implementations normalize before returning; callers rely on it.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    /// Number of dimensions every returned vector has.
    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
