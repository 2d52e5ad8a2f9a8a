/// Backend proxy handlers (`/api/recommend`)
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;
use serde_json::Value;
use tracing::info;
use tracing::warn;

use super::AppState;
use crate::proxy::validate_request;
use crate::proxy::FieldError;
use crate::proxy::ProxyFailure;

fn proxy_disabled() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"status": "fail", "message": "Recommendation proxy is disabled"})),
    )
        .into_response()
}

/// POST /api/recommend
pub async fn proxy_recommend(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Some(proxy) = state.proxy.as_ref() else {
        return proxy_disabled();
    };

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            let errors = vec![FieldError::new("", rejection.body_text())];
            return (
                StatusCode::BAD_REQUEST,
                Json(ProxyFailure::invalid_request(errors)),
            )
                .into_response();
        }
    };

    let request = match validate_request(&body) {
        Ok(request) => request,
        Err(errors) => {
            info!("POST /api/recommend - rejected ({} errors)", errors.len());
            return (
                StatusCode::BAD_REQUEST,
                Json(ProxyFailure::invalid_request(errors)),
            )
                .into_response();
        }
    };

    info!("POST /api/recommend - {:?}", request.query);
    Json(proxy.recommend(&request).await).into_response()
}

/// GET /api/recommend/health
pub async fn proxy_health(State(state): State<AppState>) -> Response {
    let Some(proxy) = state.proxy.as_ref() else {
        return proxy_disabled();
    };

    match proxy.engine_health().await {
        Ok(data) => Json(json!({"status": "success", "data": data})).into_response(),
        Err(e) => {
            warn!("⚠️ Recommendation engine health check failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "status": "error",
                    "message": "Recommendation engine unreachable"
                })),
            )
                .into_response()
        }
    }
}
