/// Recommendation pipeline handlers
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use tracing::info;

use super::AppState;
use crate::api::error::ApiResult;
use crate::api::types::ApiResponse;
use crate::api::types::TestRecommendationResponse;
use crate::errors::RecommenderError;
use crate::recommend::RecommendationRequest;
use crate::recommend::RecommendationResponse;

pub const TEST_QUERY: &str = "I want to learn Python for beginners";

/// Check the raw body before handing it to serde so callers get the field-level message
pub fn parse_recommendation_request(body: Value) -> crate::Result<RecommendationRequest> {
    match body.get("user_query") {
        Some(Value::String(q)) if !q.trim().is_empty() => {}
        _ => {
            return Err(RecommenderError::Validation(
                "user_query is required and must be a string".to_string(),
            ))
        }
    }

    serde_json::from_value(body)
        .map_err(|e| RecommenderError::Validation(format!("Invalid request body: {e}")))
}

/// POST /api/recommendations
pub async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<RecommendationResponse>>> {
    let Json(body) = payload.map_err(|e| RecommenderError::Validation(e.body_text()))?;
    let request = parse_recommendation_request(body)?;
    info!("POST /api/recommendations - {:?}", request.user_query);

    let response = state.recommendation.recommend(&request).await?;
    Ok(Json(ApiResponse::success(response)))
}

/// GET /api/recommendations/test
pub async fn recommend_test(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<TestRecommendationResponse<RecommendationResponse>>>> {
    info!("GET /api/recommendations/test");

    let request = RecommendationRequest {
        user_query: TEST_QUERY.to_string(),
        ui_chips: Vec::new(),
        max_results: Some(3),
    };
    let recommendations = state.recommendation.recommend(&request).await?;

    Ok(Json(ApiResponse::success(TestRecommendationResponse {
        test_query: TEST_QUERY.to_string(),
        recommendations,
    })))
}
