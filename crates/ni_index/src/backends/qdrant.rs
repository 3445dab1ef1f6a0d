use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use ni_core::{DocumentStore, Error, IndexDocument, Result};
use qdrant_client::qdrant::{
    r#match::MatchValue, vectors_config::Config, CountPoints, CreateCollection, Distance,
    FieldCondition, Filter, Match, PointStruct, UpsertPoints, VectorParams, VectorsConfig,
};
use qdrant_client::{Payload, Qdrant};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub collection: String,
    pub vector_size: u64,
}

impl QdrantConfig {
    pub fn new() -> Self {
        let host = env::var("QDRANT_HOST").unwrap_or_else(|_| "qdrant".to_string());
        Self {
            url: format!("http://{}:6334", host),
            collection: "articles".to_string(),
            vector_size: 1024,
        }
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub struct QdrantStore {
    client: Arc<Qdrant>,
    collection: String,
}

impl QdrantStore {
    /// Connects and creates the collection when missing (cosine distance,
    /// configured vector size).
    pub async fn new(config: QdrantConfig) -> Result<Self> {
        let client = Qdrant::from_url(&config.url)
            .build()
            .map_err(|e| Error::Store(format!("qdrant connect: {}", e)))?;
        let client = Arc::new(client);

        let collections = client
            .list_collections()
            .await
            .map_err(|e| Error::Store(format!("qdrant list collections: {}", e)))?;

        if !collections
            .collections
            .iter()
            .any(|c| c.name == config.collection)
        {
            let vector_config = VectorsConfig {
                config: Some(Config::Params(VectorParams {
                    size: config.vector_size,
                    distance: Distance::Cosine.into(),
                    ..Default::default()
                })),
            };

            client
                .create_collection(CreateCollection {
                    collection_name: config.collection.clone(),
                    vectors_config: Some(vector_config),
                    ..Default::default()
                })
                .await
                .map_err(|e| Error::Store(format!("qdrant create collection: {}", e)))?;
        }

        Ok(Self {
            client,
            collection: config.collection,
        })
    }

    fn url_filter(url: &str) -> Filter {
        Filter {
            must: vec![FieldCondition {
                key: "metadata.url".to_string(),
                r#match: Some(Match {
                    match_value: Some(MatchValue::Keyword(url.to_string())),
                }),
                ..Default::default()
            }
            .into()],
            ..Default::default()
        }
    }
}

#[async_trait]
impl DocumentStore for QdrantStore {
    async fn exists(&self, url: &str) -> Result<bool> {
        let response = self
            .client
            .count(CountPoints {
                collection_name: self.collection.clone(),
                filter: Some(Self::url_filter(url)),
                exact: Some(true),
                ..Default::default()
            })
            .await
            .map_err(|e| Error::Store(format!("qdrant count: {}", e)))?;

        Ok(response.result.map(|r| r.count > 0).unwrap_or(false))
    }

    async fn index_document(&self, document: &IndexDocument) -> Result<()> {
        let payload = Payload::try_from(serde_json::json!({
            "metadata": document.metadata,
            "text": document.text,
        }))
        .map_err(|e| Error::Store(format!("qdrant payload: {}", e)))?;

        let point = PointStruct::new(
            Uuid::new_v4().to_string(),
            document.embedding.clone(),
            payload,
        );

        self.client
            .upsert_points(UpsertPoints {
                collection_name: self.collection.clone(),
                points: vec![point],
                ..Default::default()
            })
            .await
            .map_err(|e| Error::Store(format!("qdrant upsert: {}", e)))?;

        Ok(())
    }
}
