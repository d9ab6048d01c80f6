// Text generation backends

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::load_balancer::LoadBalancer;

#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, system_instruction: &str, prompt: &str) -> Result<String>;

    /// Backend name for logs.
    fn name(&self) -> &str;
}

/// OpenAI chat completions.
#[derive(Clone)]
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiGenerator {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: &str,
        model: String,
        max_tokens: u32,
    ) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::Config("OpenAI API key cannot be empty".to_string()));
        }
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            max_tokens,
        })
    }
}

impl std::fmt::Debug for OpenAiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiGenerator")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(&self, system_instruction: &str, prompt: &str) -> Result<String> {
        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_instruction},
                {"role": "user", "content": prompt},
            ],
            "max_tokens": self.max_tokens,
        });

        let res = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::Generation(format!("OpenAI API error {status}: {text}")));
        }

        let body: JsonValue = res.json().await?;
        completion_content(&body)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

fn completion_content(body: &JsonValue) -> Result<String> {
    body.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| AppError::Generation("invalid OpenAI response format".to_string()))
}

// Ollama /api/generate request format
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

// Ollama /api/generate response format
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// Ollama servers behind the round-robin [`LoadBalancer`].
pub struct OllamaGenerator {
    client: reqwest::Client,
    load_balancer: Arc<LoadBalancer>,
    model: String,
}

impl OllamaGenerator {
    pub fn new(client: reqwest::Client, load_balancer: Arc<LoadBalancer>, model: String) -> Self {
        Self {
            client,
            load_balancer,
            model,
        }
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, system_instruction: &str, prompt: &str) -> Result<String> {
        let backend = self
            .load_balancer
            .get_backend()
            .ok_or_else(|| AppError::Generation("no healthy generator backends available".to_string()))?;
        tracing::debug!(url = %backend.url, "using generator backend");

        let request = OllamaRequest {
            model: &self.model,
            prompt,
            system: system_instruction,
            stream: false,
        };

        let res = match self
            .client
            .post(format!("{}/api/generate", backend.url))
            .json(&request)
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) => {
                backend.set_healthy(false);
                tracing::warn!(url = %backend.url, error = %e, "generator backend failed, marked unhealthy");
                return Err(e.into());
            }
        };

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::Generation(format!("Ollama error {status}: {text}")));
        }

        let body: OllamaResponse = res.json().await?;
        Ok(body.response)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
