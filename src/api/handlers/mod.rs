/// API request handlers
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;

use crate::api::types::ApiResponse;
use crate::api::types::HealthResponse;
use crate::api::types::HealthState;
use crate::api::types::ServicesHealth;
use crate::catalog::CourseCatalog;
use crate::models::ServiceStatus;
use crate::proxy::RecommendProxy;
use crate::recommend::RecommendationService;

pub mod courses;
pub mod proxy;
pub mod recommendations;

pub use courses::*;
pub use proxy::*;
pub use recommendations::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommendation: Arc<RecommendationService>,
    pub catalog: Arc<CourseCatalog>,
    /// Present when the `/api/recommend` family is enabled
    pub proxy: Option<Arc<RecommendProxy>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(recommendation: Arc<RecommendationService>, proxy: Option<Arc<RecommendProxy>>) -> Self {
        Self {
            catalog: recommendation.catalog().clone(),
            recommendation,
            proxy,
            started_at: Instant::now(),
        }
    }
}

/// Health check handler; 503 until both the model and the index are ready
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let index = state.recommendation.health().await;
    let ready = index.models == ServiceStatus::Ready && index.vector_store == ServiceStatus::Ready;
    debug!("GET /health - models={:?} vector_store={:?}", index.models, index.vector_store);

    let body = HealthResponse {
        status: if ready {
            HealthState::Healthy
        } else {
            HealthState::Unhealthy
        },
        services: ServicesHealth {
            models: index.models,
            vector_store: index.vector_store,
        },
        uptime: state.started_at.elapsed().as_secs_f64(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ApiResponse::success(body)))
}
