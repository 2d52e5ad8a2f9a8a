//! LLM API client for OpenAI-compatible and Ollama chat endpoints

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use super::TextGenerator;
use crate::config::AppConfig;
use crate::errors::RecommenderError;
use crate::errors::Result;

/// Supported LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAI,
    Ollama,
}

impl LlmProvider {
    /// `ollama` as the key (or no key at all) selects Ollama
    pub fn infer(endpoint: &str, key: &str) -> Self {
        if key.is_empty() || key.eq_ignore_ascii_case("ollama") || endpoint.contains("11434") {
            LlmProvider::Ollama
        } else {
            LlmProvider::OpenAI
        }
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

pub struct LlmService {
    provider: LlmProvider,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    client: Client,
}

impl LlmService {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let llm = &config.llm;
        let client = Client::builder()
            .timeout(Duration::from_secs(llm.timeout_secs.max(1)))
            .build()
            .map_err(|e| RecommenderError::HttpError(e.to_string()))?;

        let provider = LlmProvider::infer(&llm.llm_endpoint, &llm.llm_key);
        info!(
            "🤖 LLM client ready: {:?} model {} at {}",
            provider, llm.llm_model, llm.llm_endpoint
        );

        Ok(Self {
            provider,
            endpoint: llm.llm_endpoint.trim_end_matches('/').to_string(),
            api_key: llm.llm_key.clone(),
            model: llm.llm_model.clone(),
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
            client,
        })
    }

    pub const fn provider(&self) -> LlmProvider {
        self.provider
    }

    async fn generate_openai(&self, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct OpenAIRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage<'a>>,
            temperature: f32,
            max_tokens: usize,
        }

        #[derive(Deserialize)]
        struct OpenAIResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ResponseMessage,
        }

        #[derive(Deserialize)]
        struct ResponseMessage {
            #[serde(default)]
            content: Option<String>,
        }

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Calling OpenAI chat API: {}", url);

        let request = OpenAIRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RecommenderError::LlmError(format!(
                "OpenAI API error ({status}): {error_text}"
            )));
        }

        let result: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| RecommenderError::LlmError(format!("Failed to parse response: {e}")))?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| RecommenderError::LlmError("No completion in response".to_string()))
    }

    async fn generate_ollama(&self, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct OllamaOptions {
            temperature: f32,
            num_predict: usize,
        }

        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage<'a>>,
            stream: bool,
            options: OllamaOptions,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            message: OllamaMessage,
        }

        #[derive(Deserialize)]
        struct OllamaMessage {
            content: String,
        }

        let url = format!("{}/api/chat", self.endpoint);
        debug!("Calling Ollama chat API: {}", url);

        let request = OllamaRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RecommenderError::LlmError(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let result: OllamaResponse = response
            .json()
            .await
            .map_err(|e| RecommenderError::LlmError(format!("Failed to parse response: {e}")))?;

        Ok(result.message.content)
    }
}

#[async_trait]
impl TextGenerator for LlmService {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let text = match self.provider {
            LlmProvider::OpenAI => self.generate_openai(prompt).await?,
            LlmProvider::Ollama => self.generate_ollama(prompt).await?,
        };

        if text.trim().is_empty() {
            return Err(RecommenderError::LlmError(
                "LLM returned empty response".to_string(),
            ));
        }
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
