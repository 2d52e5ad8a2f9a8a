//! Chroma vector database over its v1 HTTP API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use tracing::info;

use super::VectorIndex;
use crate::config::VectorStoreConfig;
use crate::errors::RecommenderError;
use crate::errors::Result;
use crate::models::CourseLevel;
use crate::models::ScoredDocument;
use crate::models::VectorDocument;
use crate::models::VectorMetadata;

/// Separator for list metadata; Chroma metadata values must be scalars
const FEATURE_SEPARATOR: &str = " | ";

pub struct ChromaVectorStore {
    base_url: String,
    collection_name: String,
    collection_id: RwLock<Option<String>>,
    client: Client,
}

#[derive(Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    ids: Vec<Vec<String>>,
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<Value>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<f32>>>,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    ids: Vec<&'a str>,
    embeddings: Vec<&'a [f32]>,
    documents: Vec<&'a str>,
    metadatas: Vec<Value>,
}

impl ChromaVectorStore {
    pub fn new(config: &VectorStoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| RecommenderError::HttpError(e.to_string()))?;

        Ok(Self {
            base_url: config.chroma_url(),
            collection_name: config.collection.clone(),
            collection_id: RwLock::new(None),
            client,
        })
    }

    async fn heartbeat(&self) -> Result<()> {
        let url = format!("{}/api/v1/heartbeat", self.base_url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(RecommenderError::VectorStoreError(format!(
                "Chroma heartbeat failed ({})",
                response.status()
            )));
        }
        Ok(())
    }

    async fn get_or_create_collection(&self) -> Result<String> {
        let url = format!("{}/api/v1/collections", self.base_url);
        let body = json!({
            "name": self.collection_name,
            "metadata": { "hnsw:space": "cosine" },
            "get_or_create": true,
        });

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RecommenderError::VectorStoreError(format!(
                "Chroma collection error ({status}): {error_text}"
            )));
        }

        let collection: CollectionResponse = response.json().await.map_err(|e| {
            RecommenderError::VectorStoreError(format!("Failed to parse collection: {e}"))
        })?;
        Ok(collection.id)
    }

    async fn collection_id(&self) -> Result<String> {
        self.collection_id.read().await.clone().ok_or_else(|| {
            RecommenderError::VectorStoreError("Chroma collection not connected".to_string())
        })
    }

    async fn post_collection(&self, action: &str, body: &impl Serialize) -> Result<reqwest::Response> {
        let id = self.collection_id().await?;
        let url = format!("{}/api/v1/collections/{}/{}", self.base_url, id, action);
        let response = self.client.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RecommenderError::VectorStoreError(format!(
                "Chroma {action} error ({status}): {error_text}"
            )));
        }
        Ok(response)
    }
}

fn metadata_to_value(metadata: &VectorMetadata) -> Value {
    json!({
        "course_id": metadata.course_id,
        "course_title": metadata.course_title,
        "level": metadata.level.as_str(),
        "price": metadata.price,
        "features": metadata.features.join(FEATURE_SEPARATOR),
    })
}

fn metadata_from_value(id: &str, value: Option<&Value>) -> VectorMetadata {
    let field = |name: &str| value.and_then(|v| v.get(name));
    VectorMetadata {
        course_id: field("course_id")
            .and_then(Value::as_str)
            .unwrap_or(id)
            .to_string(),
        course_title: field("course_title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        level: field("level")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or(CourseLevel::AllLevels),
        price: field("price").and_then(Value::as_f64).unwrap_or_default(),
        features: field("features")
            .and_then(Value::as_str)
            .map(|s| {
                s.split(FEATURE_SEPARATOR)
                    .filter(|f| !f.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    }
}

#[async_trait]
impl VectorIndex for ChromaVectorStore {
    async fn connect(&self) -> Result<()> {
        self.heartbeat().await?;
        let id = self.get_or_create_collection().await?;
        info!(
            "🗄️ Connected to Chroma at {} (collection {} = {})",
            self.base_url, self.collection_name, id
        );
        *self.collection_id.write().await = Some(id);
        Ok(())
    }

    async fn upsert(&self, documents: Vec<VectorDocument>) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let request = UpsertRequest {
            ids: documents.iter().map(|d| d.id.as_str()).collect(),
            embeddings: documents.iter().map(|d| d.embedding.as_slice()).collect(),
            documents: documents.iter().map(|d| d.content.as_str()).collect(),
            metadatas: documents.iter().map(|d| metadata_to_value(&d.metadata)).collect(),
        };

        self.post_collection("upsert", &request).await?;
        debug!("Upserted {} documents into Chroma", documents.len());
        Ok(())
    }

    async fn query(
        &self,
        embedding: &[f32],
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<ScoredDocument>> {
        let body = json!({
            "query_embeddings": [embedding],
            "n_results": limit.max(1),
            "include": ["documents", "metadatas", "distances"],
        });

        let response: QueryResponse = self
            .post_collection("query", &body)
            .await?
            .json()
            .await
            .map_err(|e| RecommenderError::VectorStoreError(format!("Failed to parse query: {e}")))?;

        let ids = response.ids.into_iter().next().unwrap_or_default();
        let documents = response
            .documents
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();
        let metadatas = response
            .metadatas
            .and_then(|m| m.into_iter().next())
            .unwrap_or_default();
        let distances = response
            .distances
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();

        let mut hits: Vec<ScoredDocument> = ids
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                // cosine space: distance = 1 - similarity
                let score = 1.0 - *distances.get(i)?;
                if score < threshold {
                    return None;
                }
                Some(ScoredDocument {
                    document: VectorDocument {
                        id: id.clone(),
                        content: documents.get(i).cloned().flatten().unwrap_or_default(),
                        metadata: metadata_from_value(id, metadatas.get(i).and_then(Option::as_ref)),
                        embedding: Vec::new(),
                    },
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn count(&self) -> Result<usize> {
        let id = self.collection_id().await?;
        let url = format!("{}/api/v1/collections/{}/count", self.base_url, id);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(RecommenderError::VectorStoreError(format!(
                "Chroma count failed ({})",
                response.status()
            )));
        }
        let count: usize = response.json().await.map_err(|e| {
            RecommenderError::VectorStoreError(format!("Failed to parse count: {e}"))
        })?;
        Ok(count)
    }

    fn name(&self) -> &'static str {
        "chroma"
    }
}
