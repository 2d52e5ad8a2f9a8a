/// Catalog browsing handlers
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::Json;
use tracing::info;
use tracing::warn;

use super::AppState;
use crate::api::error::ApiResult;
use crate::api::types::ApiResponse;
use crate::api::types::CourseQuery;
use crate::api::types::SimilarCourse;
use crate::api::types::SimilarQuery;
use crate::catalog::CourseFilters;
use crate::errors::RecommenderError;
use crate::models::Course;
use crate::models::CourseLevel;

impl CourseQuery {
    pub fn filters(&self) -> crate::Result<CourseFilters> {
        let level = self
            .level
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .map(str::parse::<CourseLevel>)
            .transpose()?;

        let features = self
            .features
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(ToString::to_string)
            .collect();

        Ok(CourseFilters {
            level,
            max_price: self.max_price,
            features,
        })
    }
}

/// GET /api/courses
pub async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Course>>>> {
    info!("GET /api/courses - q={:?}", params.q);

    let filters = params.filters()?;
    let courses = state
        .catalog
        .search(params.q.as_deref().unwrap_or_default(), &filters)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ApiResponse::success(courses)))
}

/// GET /api/courses/:id
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Course>>> {
    info!("GET /api/courses/{}", id);

    let course = state
        .catalog
        .get(&id)
        .cloned()
        .ok_or_else(|| RecommenderError::NotFound(format!("Course not found: {id}")))?;

    Ok(Json(ApiResponse::success(course)))
}

/// GET /api/courses/similar
///
/// Direct nearest-neighbour lookup using the index similarity threshold. An
/// unavailable embedding model yields an empty list.
pub async fn similar_courses(
    State(state): State<AppState>,
    Query(params): Query<SimilarQuery>,
) -> ApiResult<Json<ApiResponse<Vec<SimilarCourse>>>> {
    info!("GET /api/courses/similar - q={:?}", params.q);

    if params.q.trim().is_empty() {
        return Err(RecommenderError::Validation("q must not be empty".to_string()).into());
    }

    let config = state.recommendation.config();
    let limit = config.clamp_max_results(params.limit);
    let hits = match state
        .recommendation
        .vector_store()
        .search_text(&params.q, limit, config.index_similarity_threshold)
        .await
    {
        Ok(hits) => hits,
        Err(e) => {
            warn!("⚠️ Similar course lookup unavailable: {}", e);
            Vec::new()
        }
    };

    let courses = hits
        .into_iter()
        .filter_map(|hit| {
            state.catalog.get(&hit.document.id).map(|course| SimilarCourse {
                course: course.clone(),
                similarity: hit.score,
            })
        })
        .collect();

    Ok(Json(ApiResponse::success(courses)))
}
