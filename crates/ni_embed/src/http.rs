use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use ni_core::{Embedder, Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::l2_normalize;

pub const DEFAULT_MODEL: &str = "intfloat/multilingual-e5-large";
pub const DEFAULT_DIMENSION: usize = 1024;

#[derive(Debug, Clone)]
pub struct EmbedConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub dimension: usize,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/v1".to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            dimension: DEFAULT_DIMENSION,
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest {
    input: String,
    model: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for an OpenAI-style `/embeddings` endpoint. The served model is
/// expected to be multilingual; the default targets e5-large.
pub struct HttpEmbedder {
    client: Arc<Client>,
    config: EmbedConfig,
}

impl HttpEmbedder {
    pub fn new(config: EmbedConfig) -> Self {
        Self {
            client: Arc::new(Client::new()),
            config,
        }
    }
}

impl fmt::Debug for HttpEmbedder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpEmbedder")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    fn name(&self) -> &str {
        &self.config.model
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            input: text.to_string(),
            model: self.config.model.clone(),
        };

        let mut builder = self
            .client
            .post(format!("{}/embeddings", self.config.base_url))
            .json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", api_key));
        }

        // Backend failures stay in the embedding error class.
        let response = builder
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::Embedding(format!("backend status: {}", e)))?
            .json::<EmbeddingResponse>()
            .await
            .map_err(|e| Error::Embedding(format!("bad response: {}", e)))?;

        let mut embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| Error::Embedding("backend returned no embedding".to_string()))?;

        if embedding.len() != self.config.dimension {
            return Err(Error::Embedding(format!(
                "expected {} dimensions, got {}",
                self.config.dimension,
                embedding.len()
            )));
        }

        l2_normalize(&mut embedding);
        Ok(embedding)
    }
}
