//! Recommendation pipeline: intent, exact, similar, fallback, format

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::fallback::FallbackRanker;
use super::fallback::MessageSelector;
use super::fallback::RandomSelector;
use super::formatter::format_response;
use super::formatter::RecommendationResponse;
use super::matcher::ExactMatcher;
use super::similarity::SimilaritySearcher;
use crate::catalog::CourseCatalog;
use crate::config::AppConfig;
use crate::config::RecommendationConfig;
use crate::embeddings::EmbeddingService;
use crate::errors::RecommenderError;
use crate::errors::Result;
use crate::intent::enhanced_query;
use crate::intent::IntentParser;
use crate::llm::LlmService;
use crate::llm::TextGenerator;
use crate::models::MatchType;
use crate::vector_store::IndexHealth;
use crate::vector_store::VectorStoreService;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub user_query: String,
    #[serde(default)]
    pub ui_chips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

impl RecommendationRequest {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            ..Default::default()
        }
    }
}

pub struct RecommendationService {
    catalog: Arc<CourseCatalog>,
    intent_parser: IntentParser,
    matcher: ExactMatcher,
    similarity: SimilaritySearcher,
    fallback: FallbackRanker,
    config: RecommendationConfig,
}

impl RecommendationService {
    pub fn new(
        catalog: Arc<CourseCatalog>,
        intent_parser: IntentParser,
        vector_store: Arc<VectorStoreService>,
        config: RecommendationConfig,
    ) -> Self {
        Self::with_selector(
            catalog,
            intent_parser,
            vector_store,
            config,
            Arc::new(RandomSelector),
        )
    }

    /// Wire the production services from configuration; nothing is contacted until `initialize`
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let catalog = Arc::new(CourseCatalog::load(&config.catalog.path));
        let embedder = Arc::new(EmbeddingService::new(config)?);
        let vector_store = Arc::new(VectorStoreService::from_config(config, embedder)?);

        let generator: Option<Arc<dyn TextGenerator>> = if config.llm.enabled {
            Some(Arc::new(LlmService::new(config)?))
        } else {
            info!("🧠 LLM intent parsing disabled, using keyword rules");
            None
        };

        Ok(Self::new(
            catalog,
            IntentParser::new(generator),
            vector_store,
            config.recommendation.clone(),
        ))
    }

    pub fn with_selector(
        catalog: Arc<CourseCatalog>,
        intent_parser: IntentParser,
        vector_store: Arc<VectorStoreService>,
        config: RecommendationConfig,
        selector: Arc<dyn MessageSelector>,
    ) -> Self {
        Self {
            matcher: ExactMatcher::new(&config),
            similarity: SimilaritySearcher::new(vector_store, config.similarity_threshold),
            fallback: FallbackRanker::new(
                config.fallback_count,
                config.fallback_confidence,
                selector,
            ),
            catalog,
            intent_parser,
            config,
        }
    }

    /// Index the catalog; an unavailable embedding model only disables the similarity stage
    pub async fn initialize(&self) -> IndexHealth {
        let store = self.similarity.store();
        match store.initialize(&self.catalog).await {
            Ok(count) => info!("✅ Recommendation service ready ({} courses indexed)", count),
            Err(e) => warn!(
                "⚠️ Vector index unavailable, similarity matching disabled: {}",
                e
            ),
        }
        store.health().await
    }

    pub async fn health(&self) -> IndexHealth {
        self.similarity.store().health().await
    }

    pub fn catalog(&self) -> &Arc<CourseCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    pub fn vector_store(&self) -> &Arc<VectorStoreService> {
        self.similarity.store()
    }

    pub async fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationResponse> {
        let user_query = request.user_query.trim();
        if user_query.is_empty() {
            return Err(RecommenderError::Validation(
                "user_query must be a non-empty string".to_string(),
            ));
        }

        let max_results = self.config.clamp_max_results(request.max_results);
        let query = enhanced_query(user_query, &request.ui_chips);
        info!("🎯 Processing recommendation request: {:?}", query);

        let intent = self.intent_parser.parse(&query).await;
        debug!("🧠 Parsed intent: {:?}", intent);

        let courses = self.catalog.all();

        let exact = self.matcher.find_matches(courses, &intent, max_results);
        if !exact.is_empty() {
            info!("✅ Found {} exact matches", exact.len());
            return Ok(format_response(
                &request.user_query,
                intent,
                exact,
                MatchType::Exact,
            ));
        }

        let similar = self
            .similarity
            .find_similar(&query, &self.catalog, max_results)
            .await;
        if !similar.is_empty() {
            info!("📊 Found {} similar matches", similar.len());
            return Ok(format_response(
                &request.user_query,
                intent,
                similar,
                MatchType::Similar,
            ));
        }

        info!("💡 Using fallback recommendations");
        let fallback = self.fallback.rank(courses, max_results);
        Ok(format_response(
            &request.user_query,
            intent,
            fallback,
            MatchType::Fallback,
        ))
    }
}
