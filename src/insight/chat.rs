// OpenAI-compatible chat-completions implementation.
//
// Both OpenAI and Groq expose POST {base}/chat/completions with the same
// request and response shapes, so a single client parameterized by base
// URL, key and model covers every registered backend.
//
// Calls are single-shot request/response: no streaming, no retry, no
// timeout beyond reqwest defaults. Failures propagate unchanged.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::ChatBackend;

/// OpenAI API root.
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// Groq's OpenAI-compatible API root.
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1";

/// Chat-completions backend for one provider + model pair.
#[derive(Debug)]
pub struct ChatCompletionsBackend {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionsBackend {
    /// Create a backend for `model` served at `base_url`.
    pub fn new(client: Client, base_url: &str, api_key: String, model: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl ChatBackend for ChatCompletionsBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(
            model = %self.model,
            prompt_preview = &prompt[..prompt.len().min(80)],
            "Chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Chat completion request failed for {}", self.model))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Chat API ({}) returned {status}: {body}", self.model);
        }

        let result: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        result
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("Chat API ({}) returned no choices", self.model))
    }
}

// --- Chat completions request/response types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}
