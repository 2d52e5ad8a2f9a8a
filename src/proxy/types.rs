//! Wire types for the backend recommendation proxy

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::models::MatchType;

pub const DEFAULT_LOCALE: &str = "en-IN";
pub const DEFAULT_PROXY_MAX_RESULTS: usize = 5;
pub const PROXY_MAX_RESULTS_LIMIT: usize = 10;

/// A validated `POST /api/recommend` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentRequest {
    pub query: String,
    pub chips: Vec<String>,
    #[serde(rename = "userContext")]
    pub user_context: Map<String, Value>,
    pub locale: String,
    pub max_results: usize,
}

/// One failed validation rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: Vec<String>,
    pub message: String,
}

impl FieldError {
    pub fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: vec![path.to_string()],
            message: message.into(),
        }
    }
}

/// Body sent to the engine's `/api/recommendations`
#[derive(Debug, Clone, Serialize)]
pub struct EngineRequest<'a> {
    pub user_query: &'a str,
    pub ui_chips: &'a [String],
    pub max_results: usize,
}

/// Engine response envelope, read leniently
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<EngineData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineData {
    /// Either the intent summary string or the full intent object
    #[serde(default)]
    pub intent: Value,
    #[serde(default)]
    pub match_type: Option<MatchType>,
    #[serde(default)]
    pub recommendations: Vec<EngineItem>,
}

impl EngineData {
    pub fn intent_summary(&self) -> String {
        match &self.intent {
            Value::String(s) => s.clone(),
            Value::Object(map) => map
                .get("intent")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            _ => "unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineItem {
    pub course: EngineCourse,
    #[serde(default)]
    pub confidence_score: f32,
    #[serde(default)]
    pub reasoning: Option<String>,
    pub match_type: MatchType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineCourse {
    pub title: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Catalog-verified recommendation returned to the frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedItem {
    #[serde(rename = "courseId")]
    pub course_id: String,
    pub title: String,
    pub level: String,
    pub price: f64,
    pub currency: String,
    pub match_type: MatchType,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    pub features: Vec<String>,
    pub badge: String,
    pub cta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyData {
    pub intent: String,
    pub items: Vec<EnrichedItem>,
    pub notes: Vec<String>,
}

/// `{ status: "success", data, meta }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyResponse {
    pub status: String,
    pub data: ProxyData,
    pub meta: Map<String, Value>,
}

/// `{ status: "fail", message, errors }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyFailure {
    pub status: String,
    pub message: String,
    pub errors: Vec<FieldError>,
}

impl ProxyFailure {
    pub fn invalid_request(errors: Vec<FieldError>) -> Self {
        Self {
            status: "fail".to_string(),
            message: "Invalid request".to_string(),
            errors,
        }
    }
}
