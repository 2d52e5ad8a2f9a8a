//! Backend recommendation proxy
//!
//! Validates frontend requests, forwards them to a recommendation engine and
//! keeps only suggestions that resolve to a course in the authoritative catalog.
//! An unreachable engine is treated as an empty fallback answer.

pub mod client;
pub mod types;

use std::sync::Arc;

pub use client::EngineClient;
pub use client::RecommendationEngine;
use serde_json::json;
use serde_json::Map;
use serde_json::Value;
use tracing::debug;
use tracing::info;
use tracing::warn;
pub use types::*;

use crate::catalog::CourseCatalog;
use crate::errors::Result;
use crate::models::MatchType;

pub const NO_MATCH_NOTES: [&str; 2] = [
    "We could not verify a matching course in our catalog right now.",
    "Tip: Try exploring backend design or Python backend—skills transfer seamlessly to Node.js.",
];

pub fn badge_for(match_type: MatchType) -> &'static str {
    match match_type {
        MatchType::Exact => "Best match",
        MatchType::Similar => "Great alternative",
        MatchType::Fallback => "Learn fundamentals",
    }
}

pub fn note_for(match_type: MatchType) -> &'static str {
    match match_type {
        MatchType::Exact => "Matched your Node.js backend preference.",
        MatchType::Similar => "Closest matches based on your goal and constraints.",
        MatchType::Fallback => {
            "Master fundamentals first; switching stacks later is fast and effective."
        }
    }
}

/// Validate a raw request body, collecting every violation
pub fn validate_request(body: &Value) -> std::result::Result<IntentRequest, Vec<FieldError>> {
    let Some(object) = body.as_object() else {
        return Err(vec![FieldError::new("", "Expected object")]);
    };
    let field = |name: &str| object.get(name).filter(|v| !v.is_null());
    let mut errors = Vec::new();

    let query = match field("query") {
        Some(Value::String(q)) if q.trim().chars().count() >= 2 => q.trim().to_string(),
        Some(Value::String(_)) => {
            errors.push(FieldError::new("query", "String must contain at least 2 character(s)"));
            String::new()
        }
        Some(_) => {
            errors.push(FieldError::new("query", "Expected string"));
            String::new()
        }
        None => {
            errors.push(FieldError::new("query", "Required"));
            String::new()
        }
    };

    let chips = match field("chips") {
        None => Vec::new(),
        Some(Value::Array(items)) => {
            let chips: Vec<String> = items
                .iter()
                .filter_map(|v| v.as_str().map(ToString::to_string))
                .collect();
            if chips.len() != items.len() {
                errors.push(FieldError::new("chips", "Expected array of strings"));
            }
            chips
        }
        Some(_) => {
            errors.push(FieldError::new("chips", "Expected array"));
            Vec::new()
        }
    };

    let user_context = match field("userContext") {
        None => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            errors.push(FieldError::new("userContext", "Expected object"));
            Map::new()
        }
    };

    let locale = match field("locale") {
        None => DEFAULT_LOCALE.to_string(),
        Some(Value::String(locale)) => locale.clone(),
        Some(_) => {
            errors.push(FieldError::new("locale", "Expected string"));
            DEFAULT_LOCALE.to_string()
        }
    };

    let max_results = match field("max_results") {
        None => DEFAULT_PROXY_MAX_RESULTS,
        Some(Value::Number(n)) if n.as_f64().is_some_and(|f| f.fract() == 0.0) => {
            match n.as_u64() {
                Some(n) if (1..=PROXY_MAX_RESULTS_LIMIT as u64).contains(&n) => n as usize,
                _ => {
                    errors.push(FieldError::new(
                        "max_results",
                        format!("Number must be between 1 and {PROXY_MAX_RESULTS_LIMIT}"),
                    ));
                    DEFAULT_PROXY_MAX_RESULTS
                }
            }
        }
        Some(_) => {
            errors.push(FieldError::new("max_results", "Expected integer"));
            DEFAULT_PROXY_MAX_RESULTS
        }
    };

    if errors.is_empty() {
        Ok(IntentRequest {
            query,
            chips,
            user_context,
            locale,
            max_results,
        })
    } else {
        Err(errors)
    }
}

pub struct RecommendProxy {
    engine: Arc<dyn RecommendationEngine>,
    catalog: Arc<CourseCatalog>,
}

impl RecommendProxy {
    pub fn new(engine: Arc<dyn RecommendationEngine>, catalog: Arc<CourseCatalog>) -> Self {
        Self { engine, catalog }
    }

    pub fn catalog(&self) -> &Arc<CourseCatalog> {
        &self.catalog
    }

    /// Resolve engine items against the catalog, dropping the ones that do not resolve
    pub fn enrich(&self, items: &[EngineItem]) -> Vec<EnrichedItem> {
        items
            .iter()
            .filter_map(|item| {
                let Some(course) = self.catalog.find_by_title(&item.course.title) else {
                    debug!("Discarding engine item not in catalog: {}", item.course.title);
                    return None;
                };

                let features = if item.course.features.is_empty() {
                    course.features.clone()
                } else {
                    item.course.features.clone()
                };

                Some(EnrichedItem {
                    course_id: course.id.clone(),
                    title: course.title.clone(),
                    level: item
                        .course
                        .level
                        .clone()
                        .unwrap_or_else(|| course.level.to_string()),
                    price: course.price,
                    currency: course.currency.clone(),
                    match_type: item.match_type,
                    confidence: item.confidence_score.clamp(0.0, 1.0),
                    reasoning: item.reasoning.clone(),
                    features,
                    badge: badge_for(item.match_type).to_string(),
                    cta: "Enroll now".to_string(),
                })
            })
            .collect()
    }

    /// Forward, enrich and shape the frontend response; engine failures are absorbed
    pub async fn recommend(&self, request: &IntentRequest) -> ProxyResponse {
        info!("🔀 Proxying recommendation request: {:?}", request.query);

        let mut meta = Map::new();
        meta.insert("locale".to_string(), json!(request.locale));

        let data = match self.engine.recommend(request).await {
            Ok(EngineEnvelope {
                data: Some(data), ..
            }) => data,
            Ok(_) => {
                warn!("⚠️ Recommendation engine returned no data");
                meta.insert("error".to_string(), json!("Service temporarily unavailable"));
                EngineData::default()
            }
            Err(e) => {
                warn!("⚠️ Recommendation engine unavailable: {}", e);
                meta.insert("error".to_string(), json!("Service temporarily unavailable"));
                EngineData::default()
            }
        };

        let intent = if data.intent.is_null() {
            "unknown".to_string()
        } else {
            data.intent_summary()
        };
        let match_summary = data.match_type.unwrap_or(MatchType::Fallback);
        meta.insert("match_summary".to_string(), json!(match_summary));

        let items = self.enrich(&data.recommendations);
        let notes = if items.is_empty() {
            NO_MATCH_NOTES.iter().map(ToString::to_string).collect()
        } else {
            vec![note_for(match_summary).to_string()]
        };

        ProxyResponse {
            status: "success".to_string(),
            data: ProxyData {
                intent,
                items,
                notes,
            },
            meta,
        }
    }

    pub async fn engine_health(&self) -> Result<Value> {
        self.engine.health().await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::errors::RecommenderError;

    struct StaticEngine(Option<Value>);

    #[async_trait]
    impl RecommendationEngine for StaticEngine {
        async fn recommend(&self, _request: &IntentRequest) -> Result<EngineEnvelope> {
            match &self.0 {
                Some(value) => Ok(serde_json::from_value(value.clone())?),
                None => Err(RecommenderError::HttpError("connection refused".to_string())),
            }
        }

        async fn health(&self) -> Result<Value> {
            match &self.0 {
                Some(_) => Ok(json!({"status": "healthy"})),
                None => Err(RecommenderError::HttpError("connection refused".to_string())),
            }
        }
    }

    fn engine_item(title: &str, match_type: &str) -> Value {
        json!({
            "course": {"id": "x", "title": title, "level": "beginner", "price": 1, "features": []},
            "confidence_score": 0.7,
            "reasoning": "Perfect match: covers python",
            "match_type": match_type
        })
    }

    fn proxy(engine: StaticEngine) -> RecommendProxy {
        RecommendProxy::new(Arc::new(engine), Arc::new(CourseCatalog::built_in()))
    }

    fn request() -> IntentRequest {
        validate_request(&json!({"query": "python for beginners"})).unwrap()
    }

    #[test]
    fn test_validation_defaults() {
        let request = request();
        assert_eq!(request.locale, "en-IN");
        assert_eq!(request.max_results, 5);
        assert!(request.chips.is_empty());
    }

    #[test]
    fn test_validation_errors() {
        let errors = validate_request(&json!({"query": "a", "max_results": 11, "chips": "x"}))
            .unwrap_err();
        let paths: Vec<&str> = errors.iter().map(|e| e.path[0].as_str()).collect();
        assert_eq!(paths, vec!["query", "chips", "max_results"]);

        assert!(validate_request(&json!({})).is_err());
        assert!(validate_request(&json!({"query": "ok", "max_results": 2.5})).is_err());
        assert!(validate_request(&json!("python")).is_err());
    }

    #[tokio::test]
    async fn test_items_resolved_against_catalog() {
        let engine = StaticEngine(Some(json!({
            "success": true,
            "data": {
                "intent": {"intent": "Learn python", "keywords": ["python"]},
                "match_type": "exact",
                "recommendations": [
                    engine_item("python beginner", "exact"),
                    engine_item("Quantum Basket Weaving", "exact")
                ]
            }
        })));

        let response = proxy(engine).recommend(&request()).await;
        assert_eq!(response.status, "success");
        assert_eq!(response.data.intent, "Learn python");
        assert_eq!(response.data.items.len(), 1);

        let item = &response.data.items[0];
        assert_eq!(item.course_id, "python-beginner-1299");
        assert_eq!(item.price, 1299.0);
        assert_eq!(item.badge, "Best match");
        assert_eq!(item.cta, "Enroll now");
        assert_eq!(item.features.len(), 4);
        assert_eq!(response.data.notes, vec!["Matched your Node.js backend preference."]);
    }

    #[tokio::test]
    async fn test_engine_down_yields_empty_items_with_notes() {
        let response = proxy(StaticEngine(None)).recommend(&request()).await;
        assert_eq!(response.status, "success");
        assert!(response.data.items.is_empty());
        assert_eq!(response.data.intent, "unknown");
        assert_eq!(response.data.notes, NO_MATCH_NOTES.to_vec());
        assert_eq!(response.meta["error"], "Service temporarily unavailable");
    }

    #[tokio::test]
    async fn test_fallback_badge_and_note() {
        let engine = StaticEngine(Some(json!({
            "success": true,
            "data": {
                "intent": "General programming course",
                "match_type": "fallback",
                "recommendations": [engine_item("Python Bounder (Beginner → Intermediate)", "fallback")]
            }
        })));

        let response = proxy(engine).recommend(&request()).await;
        assert_eq!(response.data.items[0].badge, "Learn fundamentals");
        assert_eq!(response.data.items[0].course_id, "python-bounder-1899");
        assert_eq!(
            response.data.notes,
            vec!["Master fundamentals first; switching stacks later is fast and effective."]
        );
    }
}
