//! sifter-core: shared plumbing for the content sifter (configuration, errors, the
//! generation-service bridge and prompt templates).
//!
//! The content gates in `sifter-gates` only see the [`Completion`] trait; the concrete
//! [`OpenRouterBridge`] is wired in by whoever runs the pipeline.

mod config;
mod error;
mod generation;
mod openrouter_service;
pub mod prompts;

pub use config::{api_key_from_env, LlmSettings, SifterConfig, DEFAULT_API_URL, DEFAULT_FAST_MODEL, DEFAULT_QUALITY_MODEL};
pub use error::{SifterError, SifterResult};
pub use generation::{Completion, CompletionRequest, ModelTier};
pub use openrouter_service::OpenRouterBridge;
