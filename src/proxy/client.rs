//! HTTP client for a remote recommendation engine

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::types::EngineEnvelope;
use super::types::EngineRequest;
use super::types::IntentRequest;
use crate::config::ProxyConfig;
use crate::errors::RecommenderError;
use crate::errors::Result;

/// The engine as seen from the proxy
#[async_trait]
pub trait RecommendationEngine: Send + Sync {
    async fn recommend(&self, request: &IntentRequest) -> Result<EngineEnvelope>;

    /// Raw health document of the engine
    async fn health(&self) -> Result<Value>;
}

pub struct EngineClient {
    base_url: String,
    timeout: Duration,
    health_timeout: Duration,
    client: Client,
}

impl EngineClient {
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| RecommenderError::HttpError(e.to_string()))?;

        Ok(Self {
            base_url: config.engine_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(config.timeout_ms.max(1)),
            health_timeout: Duration::from_millis(config.health_timeout_ms.max(1)),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RecommendationEngine for EngineClient {
    async fn recommend(&self, request: &IntentRequest) -> Result<EngineEnvelope> {
        let url = format!("{}/api/recommendations", self.base_url);
        debug!("Forwarding recommendation request to {}", url);

        let body = EngineRequest {
            user_query: &request.query,
            ui_chips: &request.chips,
            max_results: request.max_results,
        };

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RecommenderError::HttpError(format!(
                "engine returned {}",
                response.status()
            )));
        }

        let envelope: EngineEnvelope = response.json().await?;
        Ok(envelope)
    }

    async fn health(&self) -> Result<Value> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RecommenderError::HttpError(format!(
                "engine health returned {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}
