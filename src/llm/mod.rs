//! Text generation for structured intent extraction
//!
//! The engine only needs a single non-streaming completion per query, so the
//! client speaks either an OpenAI-compatible `/chat/completions` endpoint or
//! Ollama's `/api/chat`.

pub mod client;
pub mod prompts;

use async_trait::async_trait;
pub use client::LlmProvider;
pub use client::LlmService;
pub use prompts::IntentPrompts;
pub use prompts::PromptTemplate;

use crate::errors::Result;

/// Anything that can complete a prompt
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    fn model(&self) -> &str;
}
