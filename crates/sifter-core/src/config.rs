//! Sifter configuration: defaults, optional TOML file, then `SIFTER_*` environment.
//!
//! | Key | Env | Default |
//! |-----|-----|---------|
//! | content_dir | SIFTER_CONTENT_DIR | ./content |
//! | ai_gate_file | SIFTER_AI_GATE_FILE | ai-gate.md |
//! | voice_print_file | SIFTER_VOICE_PRINT_FILE | voice-print.md |
//! | max_tokens | SIFTER_MAX_TOKENS | 4096 |
//! | reference_excerpt_chars | SIFTER_REFERENCE_EXCERPT_CHARS | 2000 |
//! | llm.api_url | SIFTER_LLM__API_URL | OpenRouter chat completions |
//! | llm.quality_model | SIFTER_LLM__QUALITY_MODEL | anthropic/claude-sonnet-4 |
//! | llm.fast_model | SIFTER_LLM__FAST_MODEL | anthropic/claude-3.5-haiku |
//! | llm.timeout_secs | SIFTER_LLM__TIMEOUT_SECS | 120 |
//! | llm.retries | SIFTER_LLM__RETRIES | 3 |
//! | llm.backoff_base | SIFTER_LLM__BACKOFF_BASE | 2.0 |

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SifterResult;

const ENV_CONFIG_PATH: &str = "SIFTER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/sifter";
const ENV_LLM_API_KEY: &str = "SIFTER_LLM_API_KEY";
const ENV_OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_QUALITY_MODEL: &str = "anthropic/claude-sonnet-4";
pub const DEFAULT_FAST_MODEL: &str = "anthropic/claude-3.5-haiku";

fn default_content_dir() -> PathBuf {
    PathBuf::from("./content")
}

fn default_ai_gate_file() -> String {
    "ai-gate.md".to_string()
}

fn default_voice_print_file() -> String {
    "voice-print.md".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_reference_excerpt_chars() -> usize {
    2000
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_quality_model() -> String {
    DEFAULT_QUALITY_MODEL.to_string()
}

fn default_fast_model() -> String {
    DEFAULT_FAST_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_retries() -> u32 {
    3
}

fn default_backoff_base() -> f64 {
    2.0
}

/// Generation-service connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSettings {
    /// OpenAI-compatible chat completions endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Model used for the `Quality` tier (voice matching).
    #[serde(default = "default_quality_model")]
    pub quality_model: String,
    /// Model used for the `Fast` tier (AI-tells rewrite and corrections).
    #[serde(default = "default_fast_model")]
    pub fast_model: String,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total attempts per call, including the first.
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Wait `backoff_base^attempt` seconds between attempts.
    #[serde(default = "default_backoff_base")]
    pub backoff_base: f64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            quality_model: default_quality_model(),
            fast_model: default_fast_model(),
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            backoff_base: default_backoff_base(),
        }
    }
}

/// Top-level sifter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SifterConfig {
    /// Directory holding the reference documents.
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,
    /// AI writing tells guide, relative to `content_dir`.
    #[serde(default = "default_ai_gate_file")]
    pub ai_gate_file: String,
    /// Voice print profile, relative to `content_dir`.
    #[serde(default = "default_voice_print_file")]
    pub voice_print_file: String,
    /// Token ceiling for every rewrite and correction call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// How much of each reference document is quoted in the correction prompt.
    #[serde(default = "default_reference_excerpt_chars")]
    pub reference_excerpt_chars: usize,
    #[serde(default)]
    pub llm: LlmSettings,
}

impl Default for SifterConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            ai_gate_file: default_ai_gate_file(),
            voice_print_file: default_voice_print_file(),
            max_tokens: default_max_tokens(),
            reference_excerpt_chars: default_reference_excerpt_chars(),
            llm: LlmSettings::default(),
        }
    }
}

impl SifterConfig {
    /// Load config from file and environment. Precedence: env > `SIFTER_CONFIG` file (or
    /// `config/sifter.toml`) > defaults.
    pub fn load() -> SifterResult<Self> {
        let config_path = std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_layered(Some(Path::new(&config_path)), true)
    }

    /// Load from one specific file (no environment overlay).
    pub fn load_from_path(path: &Path) -> SifterResult<Self> {
        Self::load_layered(Some(path), false)
    }

    fn load_layered(path: Option<&Path>, with_env: bool) -> SifterResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        if with_env {
            builder = builder.add_source(
                config::Environment::with_prefix("SIFTER")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }
        let built = builder.build()?;
        Ok(built.try_deserialize()?)
    }

    /// Write this configuration as TOML, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> SifterResult<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Full path of the AI writing tells guide.
    pub fn ai_gate_path(&self) -> PathBuf {
        self.content_dir.join(&self.ai_gate_file)
    }

    /// Full path of the voice print profile.
    pub fn voice_print_path(&self) -> PathBuf {
        self.content_dir.join(&self.voice_print_file)
    }
}

/// API key for the generation service: SIFTER_LLM_API_KEY, then OPENROUTER_API_KEY.
pub fn api_key_from_env() -> Option<String> {
    env_opt_string(ENV_LLM_API_KEY).or_else(|| env_opt_string(ENV_OPENROUTER_API_KEY))
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = SifterConfig::default();
        assert_eq!(cfg.max_tokens, 4096);
        assert_eq!(cfg.reference_excerpt_chars, 2000);
        assert_eq!(cfg.llm.retries, 3);
        assert_eq!(cfg.ai_gate_path(), PathBuf::from("./content/ai-gate.md"));
        assert_eq!(cfg.voice_print_path(), PathBuf::from("./content/voice-print.md"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = SifterConfig::load_from_path(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, SifterConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sifter.toml");
        fs::write(
            &path,
            "content_dir = \"/srv/clients/acme\"\nmax_tokens = 2048\n\n[llm]\nfast_model = \"local/tiny\"\n",
        )
        .unwrap();
        let cfg = SifterConfig::load_from_path(&path).unwrap();
        assert_eq!(cfg.content_dir, PathBuf::from("/srv/clients/acme"));
        assert_eq!(cfg.max_tokens, 2048);
        assert_eq!(cfg.llm.fast_model, "local/tiny");
        assert_eq!(cfg.llm.quality_model, DEFAULT_QUALITY_MODEL);
        assert_eq!(cfg.voice_print_file, "voice-print.md");
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sifter.toml");
        let mut cfg = SifterConfig::default();
        cfg.llm.retries = 5;
        cfg.ai_gate_file = "tells.md".to_string();
        cfg.save_to_path(&path).unwrap();
        assert_eq!(SifterConfig::load_from_path(&path).unwrap(), cfg);
    }
}
