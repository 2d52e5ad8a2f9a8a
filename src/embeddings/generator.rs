//! Embedding generation service with preprocessing and batch splitting

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::client::EmbeddingClient;
use super::client::EmbeddingProvider;
use super::Embedder;
use super::EmbeddingConfig;
use super::MAX_BATCH_SIZE;
use crate::errors::RecommenderError;
use crate::errors::Result;

/// Service for generating embeddings of course documents and queries
pub struct EmbeddingService {
    client: Arc<EmbeddingClient>,
    config: EmbeddingConfig,
}

impl EmbeddingService {
    /// Create a new embedding service
    pub fn new(config: &crate::config::AppConfig) -> Result<Self> {
        Self::from_config(EmbeddingConfig::from_app_config(config))
    }

    /// Create from custom config
    pub fn from_config(config: EmbeddingConfig) -> Result<Self> {
        let client = EmbeddingClient::new(
            config.provider,
            config.model.clone(),
            config.endpoint.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs.max(1)),
        )?;

        info!(
            "🧠 Embedding service ready: {:?} model {} ({} dims)",
            config.provider, config.model, config.dimension
        );

        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    /// Generate embedding for a single text
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        let processed_text = crate::embeddings::preprocess_text_for_embedding(text)?;
        self.client.generate(&processed_text).await
    }

    /// Generate embeddings for multiple texts, in input order
    ///
    /// Texts that are empty after preprocessing get a zero vector.
    pub async fn generate_batch(&self, texts: Vec<&str>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut processed_texts = Vec::new();
        let mut empty_positions = Vec::new();

        for (i, text) in texts.iter().enumerate() {
            match crate::embeddings::preprocess_text_for_embedding(text) {
                Ok(processed) => processed_texts.push(processed),
                Err(_) => empty_positions.push(i),
            }
        }

        let mut embeddings = Vec::with_capacity(texts.len());
        for chunk in processed_texts.chunks(MAX_BATCH_SIZE) {
            let chunk_embeddings = self
                .client
                .generate_batch(chunk.iter().map(String::as_str).collect())
                .await?;
            embeddings.extend(chunk_embeddings);
        }

        let zero_vector = vec![0.0; self.config.dimension];
        for pos in empty_positions {
            embeddings.insert(pos, zero_vector.clone());
        }

        if embeddings.len() != texts.len() {
            return Err(RecommenderError::EmbeddingError(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings)
    }

    /// Get the embedding dimension
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.config.dimension
    }

    /// Get the model name
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Get the provider
    #[must_use]
    pub const fn provider(&self) -> EmbeddingProvider {
        self.config.provider
    }
}

#[async_trait]
impl Embedder for EmbeddingService {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.generate(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.generate_batch(texts.iter().map(String::as_str).collect())
            .await
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
