//! Unit tests for the recommendation pipeline
//!
//! These tests run the full intent → exact → similar → fallback flow against
//! offline fakes for the embedding model and vector index.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::catalog::CourseCatalog;
    use crate::config::RecommendationConfig;
    use crate::errors::RecommenderError;
    use crate::intent::IntentParser;
    use crate::models::MatchType;
    use crate::models::ServiceStatus;
    use crate::recommend::formatter::EMPTY_CATALOG_MESSAGE;
    use crate::recommend::formatter::FALLBACK_MESSAGE;
    use crate::recommend::formatter::SIMILAR_MESSAGE;
    use crate::recommend::*;
    use crate::test_support::*;
    use crate::vector_store::VectorStoreService;

    async fn service_with(
        catalog: CourseCatalog,
        store: VectorStoreService,
    ) -> RecommendationService {
        let service = RecommendationService::with_selector(
            Arc::new(catalog),
            IntentParser::rules_only(),
            Arc::new(store),
            RecommendationConfig::default(),
            Arc::new(FixedSelector(0)),
        );
        service.initialize().await;
        service
    }

    async fn topic_service() -> RecommendationService {
        service_with(
            CourseCatalog::built_in(),
            VectorStoreService::in_memory(Arc::new(TopicEmbedder::default())),
        )
        .await
    }

    #[tokio::test]
    async fn test_beginner_python_query_is_exact() {
        let service = topic_service().await;
        let response = service
            .recommend(&RecommendationRequest::new("I want to learn Python for beginners"))
            .await
            .unwrap();

        assert_eq!(response.match_type, MatchType::Exact);
        assert_eq!(response.recommendations[0].course.title, "Python Beginner");
        assert!(response.recommendations[0].confidence_score >= 0.4);
        assert_eq!(
            response.message,
            "Found perfect matches for your \"Learn python\" query!"
        );
        assert_eq!(response.total_results, response.recommendations.len());
        assert_eq!(response.query, "I want to learn Python for beginners");
    }

    #[tokio::test]
    async fn test_similar_stage_when_no_exact_match() {
        let service = topic_service().await;
        // Mentions python without a level, so exact scoring stays at 0.3
        let response = service
            .recommend(&RecommendationRequest::new("something with python inside"))
            .await
            .unwrap();

        assert_eq!(response.match_type, MatchType::Similar);
        assert_eq!(response.message, SIMILAR_MESSAGE);
        assert!(response
            .recommendations
            .iter()
            .all(|r| r.confidence_score >= 0.6 && r.confidence_score <= 1.0));
    }

    #[tokio::test]
    async fn test_machine_learning_falls_back_to_cheapest() {
        let service = topic_service().await;
        let response = service
            .recommend(&RecommendationRequest::new("Machine learning course"))
            .await
            .unwrap();

        assert_eq!(response.match_type, MatchType::Fallback);
        assert_eq!(response.message, FALLBACK_MESSAGE);
        assert_eq!(response.total_results, 2);
        let ids: Vec<&str> = response
            .recommendations
            .iter()
            .map(|r| r.course.id.as_str())
            .collect();
        assert_eq!(ids, vec!["python-beginner-1299", "python-bounder-1899"]);
        assert!(response.recommendations.iter().all(|r| r.confidence_score == 0.5));
    }

    #[tokio::test]
    async fn test_offline_embeddings_degrade_to_fallback() {
        let service = service_with(
            CourseCatalog::built_in(),
            VectorStoreService::in_memory(Arc::new(FailingEmbedder)),
        )
        .await;
        assert_eq!(service.health().await.models, ServiceStatus::Error);

        let response = service
            .recommend(&RecommendationRequest::new("something with python inside"))
            .await
            .unwrap();
        assert_eq!(response.match_type, MatchType::Fallback);
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let service = service_with(
            CourseCatalog::new(Vec::new()),
            VectorStoreService::in_memory(Arc::new(TopicEmbedder::default())),
        )
        .await;

        let response = service
            .recommend(&RecommendationRequest::new("I want to learn Python for beginners"))
            .await
            .unwrap();
        assert_eq!(response.match_type, MatchType::Fallback);
        assert_eq!(response.total_results, 0);
        assert_eq!(response.message, EMPTY_CATALOG_MESSAGE);
    }

    #[tokio::test]
    async fn test_chips_and_max_results() {
        let service = topic_service().await;
        let request = RecommendationRequest {
            user_query: "python".to_string(),
            ui_chips: vec!["intermediate".to_string()],
            max_results: Some(0),
        };

        let response = service.recommend(&request).await.unwrap();
        assert_eq!(response.match_type, MatchType::Exact);
        assert_eq!(response.total_results, 1);
        assert_eq!(response.recommendations[0].course.id, "python-bounder-1899");
        assert_eq!(response.query, "python");
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected() {
        let service = topic_service().await;
        let err = service
            .recommend(&RecommendationRequest::new("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, RecommenderError::Validation(_)));
    }

    #[tokio::test]
    async fn test_exact_results_are_deterministic() {
        let service = topic_service().await;
        let request = RecommendationRequest::new("beginner python under 1500");
        let a = service.recommend(&request).await.unwrap();
        let b = service.recommend(&request).await.unwrap();
        assert_eq!(a, b);
    }
}
