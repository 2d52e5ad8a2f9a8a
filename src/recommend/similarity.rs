//! Embedding nearest-neighbour stage

use std::sync::Arc;

use tracing::debug;
use tracing::warn;

use crate::catalog::CourseCatalog;
use crate::models::MatchType;
use crate::models::Recommendation;
use crate::vector_store::VectorStoreService;

pub struct SimilaritySearcher {
    store: Arc<VectorStoreService>,
    threshold: f32,
}

impl SimilaritySearcher {
    pub fn new(store: Arc<VectorStoreService>, threshold: f32) -> Self {
        Self { store, threshold }
    }

    pub fn store(&self) -> &Arc<VectorStoreService> {
        &self.store
    }

    /// Similar courses for the query; any upstream failure yields no results
    pub async fn find_similar(
        &self,
        query: &str,
        catalog: &CourseCatalog,
        limit: usize,
    ) -> Vec<Recommendation> {
        let hits = match self.store.search_text(query, limit, self.threshold).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("⚠️ Similarity search unavailable: {}", e);
                return Vec::new();
            }
        };

        hits.into_iter()
            .filter_map(|hit| {
                let Some(course) = catalog.get(&hit.document.metadata.course_id) else {
                    debug!(
                        "Dropping similarity hit for unknown course {}",
                        hit.document.metadata.course_id
                    );
                    return None;
                };
                Some(Recommendation::new(
                    course.clone(),
                    hit.score,
                    format!(
                        "Similar to your query based on course content ({:.1}% match)",
                        hit.score * 100.0
                    ),
                    MatchType::Similar,
                ))
            })
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Course;
    use crate::test_support::FailingEmbedder;
    use crate::test_support::TopicEmbedder;

    async fn searcher_for(catalog: &CourseCatalog) -> SimilaritySearcher {
        let store = VectorStoreService::in_memory(Arc::new(TopicEmbedder::default()));
        store.initialize(catalog).await.unwrap();
        SimilaritySearcher::new(Arc::new(store), 0.6)
    }

    #[tokio::test]
    async fn test_similar_reasoning_and_scores() {
        let catalog = CourseCatalog::built_in();
        let searcher = searcher_for(&catalog).await;

        let recs = searcher.find_similar("python", &catalog, 5).await;
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.match_type == MatchType::Similar));
        assert_eq!(
            recs[0].reasoning,
            "Similar to your query based on course content (100.0% match)"
        );
    }

    #[tokio::test]
    async fn test_hits_outside_catalog_are_dropped() {
        let indexed = CourseCatalog::built_in();
        let searcher = searcher_for(&indexed).await;

        let courses: Vec<Course> = indexed.all()[..1].to_vec();
        let smaller = CourseCatalog::new(courses);
        let recs = searcher.find_similar("python", &smaller, 5).await;
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].course.id, "python-beginner-1299");
    }

    #[tokio::test]
    async fn test_embedding_failure_degrades_to_empty() {
        let store = VectorStoreService::in_memory(Arc::new(FailingEmbedder));
        let searcher = SimilaritySearcher::new(Arc::new(store), 0.6);
        let recs = searcher
            .find_similar("python", &CourseCatalog::built_in(), 5)
            .await;
        assert!(recs.is_empty());
    }
}
