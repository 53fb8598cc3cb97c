//! OpenAI-compatible chat-completions generation backend.
//!
//! Both configured providers (x.ai primary, OpenAI secondary) speak the same
//! `/chat/completions` wire shape, so one backend type covers the whole
//! provider chain. Call parameters (token budget, temperature, timeout) are
//! fixed constants, not user-configurable.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use brainvault_core::defaults::{
    ENV_OPENAI_API_KEY, ENV_OPENAI_API_URL, ENV_XAI_API_KEY, ENV_XAI_API_URL, GEN_MAX_TOKENS,
    GEN_TEMPERATURE, GEN_TIMEOUT_SECS, PRIMARY_GEN_MODEL, PRIMARY_GEN_URL, SECONDARY_GEN_MODEL,
    SECONDARY_GEN_URL,
};
use brainvault_core::{Error, GenerationBackend, Result};

/// Chat-completions generation backend.
pub struct ChatCompletionsBackend {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl ChatCompletionsBackend {
    /// Create a backend against an explicit endpoint.
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
            model,
            timeout_secs: GEN_TIMEOUT_SECS,
        }
    }

    /// Primary provider (x.ai) from environment.
    /// Returns None if `XAI_API_KEY` is not set.
    pub fn primary_from_env() -> Option<Self> {
        let api_key = std::env::var(ENV_XAI_API_KEY).ok().filter(|k| !k.is_empty())?;
        let base_url =
            std::env::var(ENV_XAI_API_URL).unwrap_or_else(|_| PRIMARY_GEN_URL.to_string());
        Some(Self::new(base_url, api_key, PRIMARY_GEN_MODEL.to_string()))
    }

    /// Secondary provider (OpenAI) from environment.
    /// Returns None if `OPENAI_API_KEY` is not set.
    pub fn secondary_from_env() -> Option<Self> {
        let api_key = std::env::var(ENV_OPENAI_API_KEY)
            .ok()
            .filter(|k| !k.is_empty())?;
        let base_url =
            std::env::var(ENV_OPENAI_API_URL).unwrap_or_else(|_| SECONDARY_GEN_URL.to_string());
        Some(Self::new(base_url, api_key, SECONDARY_GEN_MODEL.to_string()))
    }
}

/// Configured generation backends in priority order: primary, then
/// secondary. The first entry that answers wins; callers fall back locally
/// when the chain is empty or every call fails.
pub fn provider_chain_from_env() -> Vec<Arc<dyn GenerationBackend>> {
    let mut chain: Vec<Arc<dyn GenerationBackend>> = Vec::new();

    if let Some(primary) = ChatCompletionsBackend::primary_from_env() {
        info!(
            subsystem = "inference",
            component = "generation",
            model = %primary.model,
            "Primary generation provider configured"
        );
        chain.push(Arc::new(primary));
    }
    if let Some(secondary) = ChatCompletionsBackend::secondary_from_env() {
        info!(
            subsystem = "inference",
            component = "generation",
            model = %secondary.model,
            "Secondary generation provider configured"
        );
        chain.push(Arc::new(secondary));
    }

    if chain.is_empty() {
        info!(
            subsystem = "inference",
            component = "generation",
            "No generation provider configured, local fallback only"
        );
    }
    chain
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl GenerationBackend for ChatCompletionsBackend {
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let start = Instant::now();

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            max_tokens: GEN_MAX_TOKENS,
            temperature: GEN_TEMPERATURE,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Provider returned {}: {}",
                status, body
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Inference("Provider returned no choices".to_string()))?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            subsystem = "inference",
            component = "generation",
            op = "generate",
            model = %self.model,
            response_len = content.len(),
            duration_ms = elapsed,
            "Generation complete"
        );
        if elapsed > 20_000 {
            warn!(
                subsystem = "inference",
                component = "generation",
                duration_ms = elapsed,
                prompt_len = prompt.len(),
                "Slow generation call"
            );
        }
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
