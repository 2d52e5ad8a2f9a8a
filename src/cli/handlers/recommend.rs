//! One-shot recommendation runs

use crate::cli::output::recommendation_summary;
use crate::recommend::RecommendationRequest;
use crate::recommend::RecommendationService;
use crate::AppConfig;
use crate::Result;

pub async fn handle_recommend_command(
    config: &AppConfig,
    query: String,
    chips: Vec<String>,
    max_results: Option<usize>,
    rules_only: bool,
) -> Result<()> {
    let mut config = config.clone();
    if rules_only {
        config.llm.enabled = false;
    }

    let service = RecommendationService::from_config(&config)?;
    service.initialize().await;

    let request = RecommendationRequest {
        user_query: query,
        ui_chips: chips,
        max_results,
    };
    let response = service.recommend(&request).await?;

    eprintln!("{}", recommendation_summary(&response));
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
