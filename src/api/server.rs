//! HTTP server implementation

use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::BoxError;
use axum::Json;
use axum::Router;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::api::types::ApiResponse;
use crate::catalog::CourseCatalog;
use crate::config::AppConfig;
use crate::config::ServerConfig;
use crate::proxy::EngineClient;
use crate::proxy::RecommendProxy;
use crate::recommend::RecommendationService;
use crate::Result;

/// Build the backend proxy when enabled; it shares the engine catalog unless a separate one is configured
pub fn build_proxy(
    config: &AppConfig,
    engine_catalog: &Arc<CourseCatalog>,
) -> Result<Option<Arc<RecommendProxy>>> {
    if !config.proxy.enabled {
        return Ok(None);
    }

    let catalog_path = config.proxy_catalog_path();
    let catalog = if catalog_path == config.catalog.path {
        engine_catalog.clone()
    } else {
        Arc::new(CourseCatalog::load(catalog_path))
    };
    let engine = Arc::new(EngineClient::new(&config.proxy)?);
    info!("🔀 Recommendation proxy forwarding to {}", engine.base_url());

    Ok(Some(Arc::new(RecommendProxy::new(engine, catalog))))
}

/// Timeouts and other middleware failures still answer with the JSON envelope
async fn handle_middleware_error(err: BoxError) -> impl IntoResponse {
    if err.is::<Elapsed>() {
        warn!("⏱️ Request timed out");
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(ApiResponse::<()>::error("Request timed out")),
        )
    } else {
        error!("Unhandled middleware error: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error("Internal server error")),
        )
    }
}

/// Router with the middleware stack applied
///
/// The concurrency limit shares one semaphore across every route.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let mut app = routes::api_routes(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    server.request_timeout_secs.max(1),
                ))),
        )
        .layer(GlobalConcurrencyLimitLayer::new(
            server.max_concurrent_requests.max(1),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    // Add CORS if enabled
    if server.enable_cors {
        info!("✅ CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Start the API server
pub async fn serve_api(config: &AppConfig) -> Result<()> {
    info!("🚀 Starting course recommendation server...");

    let recommendation = Arc::new(RecommendationService::from_config(config)?);
    let health = recommendation.initialize().await;
    info!(
        "📊 Startup status: models={:?}, vector_store={:?}",
        health.models, health.vector_store
    );

    let proxy = build_proxy(config, recommendation.catalog())?;
    let proxy_enabled = proxy.is_some();
    let state = AppState::new(recommendation, proxy);
    let app = build_router(state, &config.server);

    // Start server
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /health                    - Health check");
    info!("  POST /api/recommendations       - Get course recommendations");
    info!("  GET  /api/recommendations/test  - Sample recommendation run");
    info!("  GET  /api/courses               - Search the catalog");
    info!("  GET  /api/courses/similar       - Nearest courses by embedding");
    info!("  GET  /api/courses/:id           - Get a course by id");
    if proxy_enabled {
        info!("  POST /api/recommend             - Catalog-verified recommendations");
        info!("  GET  /api/recommend/health      - Engine health passthrough");
    }

    axum::serve(listener, app).await?;

    Ok(())
}
