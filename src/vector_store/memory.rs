//! In-process vector index using a brute-force cosine scan

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::VectorIndex;
use crate::errors::Result;
use crate::models::ScoredDocument;
use crate::models::VectorDocument;

#[derive(Default)]
pub struct InMemoryVectorStore {
    documents: RwLock<Vec<VectorDocument>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cosine similarity; zero vectors and length mismatches score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[async_trait]
impl VectorIndex for InMemoryVectorStore {
    async fn upsert(&self, documents: Vec<VectorDocument>) -> Result<()> {
        let mut stored = self.documents.write().await;
        for document in documents {
            match stored.iter_mut().find(|d| d.id == document.id) {
                Some(existing) => *existing = document,
                None => stored.push(document),
            }
        }
        debug!("In-memory index now holds {} documents", stored.len());
        Ok(())
    }

    async fn query(
        &self,
        embedding: &[f32],
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<ScoredDocument>> {
        let stored = self.documents.read().await;
        let mut hits: Vec<ScoredDocument> = stored
            .iter()
            .map(|document| ScoredDocument {
                score: cosine_similarity(embedding, &document.embedding),
                document: document.clone(),
            })
            .filter(|hit| hit.score >= threshold)
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.documents.read().await.len())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_courses;

    fn document(id: &str, embedding: Vec<f32>) -> VectorDocument {
        let mut course = default_courses().remove(0);
        course.id = id.to_string();
        let mut document = VectorDocument::from_course(&course);
        document.embedding = embedding;
        document
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_query_honours_threshold_and_order() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(vec![
                document("far", vec![0.0, 1.0]),
                document("close", vec![0.9, 0.1]),
                document("exact", vec![1.0, 0.0]),
            ])
            .await
            .unwrap();

        let hits = store.query(&[1.0, 0.0], 10, 0.6).await.unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.document.id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "close"]);

        let hits = store.query(&[1.0, 0.0], 1, 0.0).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document.id, "exact");
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let store = InMemoryVectorStore::new();
        store.upsert(vec![document("a", vec![1.0, 0.0])]).await.unwrap();
        store.upsert(vec![document("a", vec![0.0, 1.0])]).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);

        let hits = store.query(&[0.0, 1.0], 5, 0.9).await.unwrap();
        assert_eq!(hits.len(), 1);
    }
}
