//! Response envelope for a finished pipeline run

use serde::Deserialize;
use serde::Serialize;

use crate::models::MatchType;
use crate::models::Recommendation;
use crate::models::UserIntent;

pub const SIMILAR_MESSAGE: &str = "Here are some courses similar to what you're looking for:";
pub const FALLBACK_MESSAGE: &str =
    "While we couldn't find exact matches, here are some great courses to consider:";
pub const EMPTY_CATALOG_MESSAGE: &str = "No courses are available in the catalog right now.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub query: String,
    pub intent: UserIntent,
    pub recommendations: Vec<Recommendation>,
    pub message: String,
    pub total_results: usize,
    pub match_type: MatchType,
}

pub fn format_response(
    query: &str,
    intent: UserIntent,
    recommendations: Vec<Recommendation>,
    match_type: MatchType,
) -> RecommendationResponse {
    let message = match match_type {
        MatchType::Exact => format!("Found perfect matches for your \"{}\" query!", intent.intent),
        MatchType::Similar => SIMILAR_MESSAGE.to_string(),
        MatchType::Fallback if recommendations.is_empty() => EMPTY_CATALOG_MESSAGE.to_string(),
        MatchType::Fallback => FALLBACK_MESSAGE.to_string(),
    };

    RecommendationResponse {
        query: query.to_string(),
        total_results: recommendations.len(),
        intent,
        recommendations,
        message,
        match_type,
    }
}
