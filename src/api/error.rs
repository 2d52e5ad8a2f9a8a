//! Mapping of crate errors onto HTTP responses

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use tracing::error;

use crate::api::types::ApiResponse;
use crate::errors::RecommenderError;

#[derive(Debug)]
pub struct ApiError(pub RecommenderError);

impl From<RecommenderError> for ApiError {
    fn from(err: RecommenderError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            RecommenderError::Validation(_) => StatusCode::BAD_REQUEST,
            RecommenderError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            RecommenderError::Validation(msg) | RecommenderError::NotFound(msg) => msg.clone(),
            other => {
                error!("❌ Request failed: {}", other);
                "Internal server error".to_string()
            }
        };

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::from(RecommenderError::Validation("bad".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err = ApiError::from(RecommenderError::NotFound("gone".into()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let err = ApiError::from(RecommenderError::LlmError("boom".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
