//! Embeddings generation module
//!
//! Turns course documents and learner queries into dense vectors using one of
//! two HTTP providers:
//! - OpenAI-compatible `/embeddings` endpoints
//! - Ollama (`/api/embeddings`, local models such as `all-minilm`)
//!
//! # Examples
//!
//! ```rust,no_run
//! use course_recommender::config::AppConfig;
//! use course_recommender::embeddings::EmbeddingService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = EmbeddingService::new(&config)?;
//!
//!     let embedding = service.generate("Python for beginners").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod generator;
pub mod text_preprocessing;

use async_trait::async_trait;
pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;
pub use generator::EmbeddingService;
pub use text_preprocessing::preprocess_text_for_embedding;

use crate::errors::Result;

/// Maximum batch size for embedding generation
pub const MAX_BATCH_SIZE: usize = 100;

/// Anything that can turn text into vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn dimension(&self) -> usize;

    fn model(&self) -> &str;
}

/// Configuration for embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub dimension: usize,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl EmbeddingConfig {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Self {
        let embeddings = &config.embeddings;

        // Explicit provider wins, otherwise infer from the endpoint
        let provider = match embeddings.provider.to_lowercase().as_str() {
            "openai" => EmbeddingProvider::OpenAI,
            "ollama" => EmbeddingProvider::Ollama,
            _ if embeddings.endpoint.contains("openai") => EmbeddingProvider::OpenAI,
            _ => EmbeddingProvider::Ollama,
        };

        Self {
            provider,
            model: embeddings.model.clone(),
            dimension: embeddings.dimension,
            endpoint: embeddings.endpoint.trim_end_matches('/').to_string(),
            api_key: embeddings.api_key.clone(),
            timeout_secs: embeddings.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_provider_inference() {
        let mut config = AppConfig::default();
        assert_eq!(
            EmbeddingConfig::from_app_config(&config).provider,
            EmbeddingProvider::Ollama
        );

        config.embeddings.endpoint = "https://api.openai.com/v1/".to_string();
        let embedding_config = EmbeddingConfig::from_app_config(&config);
        assert_eq!(embedding_config.provider, EmbeddingProvider::OpenAI);
        assert_eq!(embedding_config.endpoint, "https://api.openai.com/v1");

        config.embeddings.provider = "Ollama".to_string();
        assert_eq!(
            EmbeddingConfig::from_app_config(&config).provider,
            EmbeddingProvider::Ollama
        );
    }
}
