//! In-crate fakes for the external services

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;

use crate::embeddings::Embedder;
use crate::errors::RecommenderError;
use crate::errors::Result;
use crate::models::ScoredDocument;
use crate::models::VectorDocument;
use crate::vector_store::VectorIndex;

/// Axes of the topic embedding space
pub const TOPIC_AXES: &[&str] = &["python", "javascript", "data", "machine", "design", "cooking"];

/// Embeds text as counts of each topic word; deterministic and offline
#[derive(Default)]
pub struct TopicEmbedder {
    pub calls: AtomicUsize,
}

impl TopicEmbedder {
    pub fn vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        TOPIC_AXES
            .iter()
            .map(|axis| lower.matches(axis).count() as f32)
            .collect()
    }
}

#[async_trait]
impl Embedder for TopicEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn dimension(&self) -> usize {
        TOPIC_AXES.len()
    }

    fn model(&self) -> &str {
        "topic-counts"
    }
}

/// Topic embedder whose single-text calls take `delay`; batch indexing stays fast
pub struct SlowEmbedder {
    pub delay: Duration,
}

#[async_trait]
impl Embedder for SlowEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        tokio::time::sleep(self.delay).await;
        Ok(TopicEmbedder::vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| TopicEmbedder::vector(t)).collect())
    }

    fn dimension(&self) -> usize {
        TOPIC_AXES.len()
    }

    fn model(&self) -> &str {
        "slow-topic-counts"
    }
}

/// Embedder whose provider is always down
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(RecommenderError::EmbeddingError("model offline".to_string()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(RecommenderError::EmbeddingError("model offline".to_string()))
    }

    fn dimension(&self) -> usize {
        TOPIC_AXES.len()
    }

    fn model(&self) -> &str {
        "offline"
    }
}

/// Index that connects and accepts writes but fails every query
#[derive(Default)]
pub struct BrokenQueryIndex {
    pub upserted: AtomicUsize,
}

#[async_trait]
impl VectorIndex for BrokenQueryIndex {
    async fn upsert(&self, documents: Vec<VectorDocument>) -> Result<()> {
        self.upserted.fetch_add(documents.len(), Ordering::SeqCst);
        Ok(())
    }

    async fn query(
        &self,
        _embedding: &[f32],
        _limit: usize,
        _threshold: f32,
    ) -> Result<Vec<ScoredDocument>> {
        Err(RecommenderError::VectorStoreError("query timed out".to_string()))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.upserted.load(Ordering::SeqCst))
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

/// Index that cannot be reached at all
pub struct UnreachableIndex;

#[async_trait]
impl VectorIndex for UnreachableIndex {
    async fn connect(&self) -> Result<()> {
        Err(RecommenderError::VectorStoreError("connection refused".to_string()))
    }

    async fn upsert(&self, _documents: Vec<VectorDocument>) -> Result<()> {
        Err(RecommenderError::VectorStoreError("connection refused".to_string()))
    }

    async fn query(
        &self,
        _embedding: &[f32],
        _limit: usize,
        _threshold: f32,
    ) -> Result<Vec<ScoredDocument>> {
        Err(RecommenderError::VectorStoreError("connection refused".to_string()))
    }

    async fn count(&self) -> Result<usize> {
        Ok(0)
    }

    fn name(&self) -> &'static str {
        "unreachable"
    }
}
