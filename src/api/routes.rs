//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create the recommendation engine router
pub fn api_routes(state: AppState) -> Router {
    let proxy_enabled = state.proxy.is_some();

    let mut router = Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Pipeline
        .route("/api/recommendations", post(handlers::recommend))
        .route("/api/recommendations/test", get(handlers::recommend_test))
        // Catalog
        .route("/api/courses", get(handlers::list_courses))
        .route("/api/courses/similar", get(handlers::similar_courses))
        .route("/api/courses/:id", get(handlers::get_course));

    if proxy_enabled {
        router = router
            .route("/api/recommend", post(handlers::proxy_recommend))
            .route("/api/recommend/health", get(handlers::proxy_health));
    }

    router.with_state(state)
}
