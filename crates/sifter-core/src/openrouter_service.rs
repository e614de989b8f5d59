//! OpenRouter bridge: OpenAI-compatible chat completions for the content gates.
//!
//! API key: `SIFTER_LLM_API_KEY` or `OPENROUTER_API_KEY`. Each [`ModelTier`] maps to its own
//! model name. Failed calls are retried with exponential backoff; once the attempts are used
//! up the last error is returned to the caller.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{api_key_from_env, LlmSettings};
use crate::error::{SifterError, SifterResult};
use crate::generation::{Completion, CompletionRequest, ModelTier};

// OpenAI-compatible request/response for OpenRouter
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

/// Generation-service client used by the rewrite passes and the corrector.
pub struct OpenRouterBridge {
    api_key: String,
    settings: LlmSettings,
    client: reqwest::Client,
}

impl OpenRouterBridge {
    /// Create a bridge using the API key from the environment.
    pub fn from_env(settings: LlmSettings) -> SifterResult<Self> {
        let key = api_key_from_env().ok_or(SifterError::MissingApiKey)?;
        Self::new(key, settings)
    }

    /// Create a bridge with an explicit API key.
    pub fn new(api_key: impl Into<String>, settings: LlmSettings) -> SifterResult<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(SifterError::MissingApiKey);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            api_key,
            settings,
            client,
        })
    }

    /// Model name configured for a tier.
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.settings.fast_model,
            ModelTier::Quality => &self.settings.quality_model,
        }
    }

    fn build_body(&self, request: &CompletionRequest) -> ChatRequest {
        ChatRequest {
            model: self.model_for(request.tier).to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user.clone(),
                },
            ],
            max_tokens: Some(request.max_tokens),
        }
    }

    /// One HTTP round trip, no retries.
    pub async fn complete_once(&self, request: &CompletionRequest) -> SifterResult<String> {
        let body = self.build_body(request);
        let res = self
            .client
            .post(&self.settings.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("X-Title", "Content-Sifter-Gates")
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(SifterError::Generation(format!("API error {}: {}", status, body)));
        }

        let parsed: ChatResponse = res
            .json()
            .await
            .map_err(|e| SifterError::Generation(format!("response parse failed: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SifterError::Generation("response contained no choices".to_string()))
    }

    fn backoff_delay(&self, attempt: u32) -> Duration {
        backoff_delay(self.settings.backoff_base, attempt)
    }
}

/// `base^attempt` seconds; a non-finite or negative base waits zero.
fn backoff_delay(base: f64, attempt: u32) -> Duration {
    let secs = base.powi(attempt as i32);
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f64(secs)
    } else {
        Duration::ZERO
    }
}

#[async_trait::async_trait]
impl Completion for OpenRouterBridge {
    async fn complete(&self, request: CompletionRequest) -> SifterResult<String> {
        let attempts = self.settings.retries.max(1);
        let mut attempt = 0;
        loop {
            match self.complete_once(&request).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt + 1 < attempts => {
                    let wait = self.backoff_delay(attempt);
                    tracing::warn!(
                        target: "sifter::llm",
                        attempt = attempt + 1,
                        tier = request.tier.as_str(),
                        wait_secs = wait.as_secs_f64(),
                        error = %e,
                        "Generation call failed; retrying"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
