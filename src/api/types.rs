//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::models::Course;
use crate::models::ServiceStatus;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String,
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            timestamp: now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesHealth {
    pub models: ServiceStatus,
    pub vector_store: ServiceStatus,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthState,
    pub services: ServicesHealth,
    /// Seconds since the server started
    pub uptime: f64,
    pub version: String,
}

/// `GET /api/courses` query string
#[derive(Debug, Default, Deserialize)]
pub struct CourseQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub max_price: Option<f64>,
    /// Comma-separated feature names
    #[serde(default)]
    pub features: Option<String>,
}

/// `GET /api/courses/similar` query string
#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    pub q: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SimilarCourse {
    pub course: Course,
    pub similarity: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TestRecommendationResponse<T> {
    pub test_query: String,
    pub recommendations: T,
}
