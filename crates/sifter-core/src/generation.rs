//! Generation-service seam: every rewrite and correction goes through [`Completion`].

use serde::{Deserialize, Serialize};

use crate::error::SifterResult;

/// Capability tier for a call. Cheap mechanical rewrites go to `Fast`; voice work goes to `Quality`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    Fast,
    Quality,
}

impl ModelTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Fast => "fast",
            ModelTier::Quality => "quality",
        }
    }
}

/// One system + user prompt pair sent to the generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub tier: ModelTier,
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(tier: ModelTier, system: impl Into<String>, user: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            tier,
            system: system.into(),
            user: user.into(),
            max_tokens,
        }
    }
}

/// A text generation backend. Returns the generated text or fails; the gates never retry on their own.
#[async_trait::async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> SifterResult<String>;
}

#[async_trait::async_trait]
impl<T: Completion + ?Sized> Completion for std::sync::Arc<T> {
    async fn complete(&self, request: CompletionRequest) -> SifterResult<String> {
        (**self).complete(request).await
    }
}
