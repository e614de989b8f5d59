//! Rewrite passes: one generation call that rewrites the whole draft against a reference document.

use serde::{Deserialize, Serialize};
use sifter_core::prompts::{ai_gate_system_prompt, ai_gate_user_prompt, voice_gate_system_prompt, voice_gate_user_prompt};
use sifter_core::{Completion, CompletionRequest, ModelTier, SifterResult};

/// Which rewrite gate to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePass {
    /// Strip AI-writing tells using the AI-tells guide.
    AiTells,
    /// Match the client's voice using the voice print.
    Voice,
}

impl GatePass {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatePass::AiTells => "ai_tells",
            GatePass::Voice => "voice",
        }
    }

    /// Mechanical cleanup goes to the fast tier; voice matching needs the quality tier.
    pub fn tier(&self) -> ModelTier {
        match self {
            GatePass::AiTells => ModelTier::Fast,
            GatePass::Voice => ModelTier::Quality,
        }
    }

    pub fn system_prompt(&self, reference: &str) -> String {
        match self {
            GatePass::AiTells => ai_gate_system_prompt(reference),
            GatePass::Voice => voice_gate_system_prompt(reference),
        }
    }

    pub fn user_prompt(&self, draft: &str) -> String {
        match self {
            GatePass::AiTells => ai_gate_user_prompt(draft),
            GatePass::Voice => voice_gate_user_prompt(draft),
        }
    }

    pub fn request(&self, draft: &str, reference: &str, max_tokens: u32) -> CompletionRequest {
        CompletionRequest::new(self.tier(), self.system_prompt(reference), self.user_prompt(draft), max_tokens)
    }
}

/// True when the reference is present and not just whitespace.
pub(crate) fn has_reference(reference: Option<&str>) -> bool {
    reference.is_some_and(|r| !r.trim().is_empty())
}

/// Run one rewrite pass. Without a usable reference the draft comes back unchanged and no
/// call is made; otherwise the service's text replaces the draft verbatim.
pub async fn rewrite_pass(
    client: &dyn Completion,
    pass: GatePass,
    draft: &str,
    reference: Option<&str>,
    max_tokens: u32,
) -> SifterResult<String> {
    let reference = match reference.filter(|r| !r.trim().is_empty()) {
        Some(r) => r,
        None => {
            tracing::warn!(target: "sifter::gates", pass = pass.as_str(), "Reference document missing; skipping rewrite pass");
            return Ok(draft.to_string());
        }
    };

    let request = pass.request(draft, reference, max_tokens);
    let rewritten = client.complete(request).await?;
    tracing::info!(
        target: "sifter::gates",
        pass = pass.as_str(),
        tier = pass.tier().as_str(),
        before_chars = draft.chars().count(),
        after_chars = rewritten.chars().count(),
        "Rewrite pass complete"
    );
    Ok(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sifter_core::prompts::{AI_GATE_SYSTEM, VOICE_GATE_SYSTEM};
    use sifter_core::SifterError;
    use std::sync::Mutex;

    struct Recorder {
        reply: String,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl Recorder {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl Completion for Recorder {
        async fn complete(&self, request: CompletionRequest) -> SifterResult<String> {
            self.seen.lock().unwrap().push(request);
            Ok(self.reply.clone())
        }
    }

    struct Failing;

    #[async_trait::async_trait]
    impl Completion for Failing {
        async fn complete(&self, _request: CompletionRequest) -> SifterResult<String> {
            Err(SifterError::Generation("503".to_string()))
        }
    }

    #[test]
    fn passes_map_to_tiers() {
        assert_eq!(GatePass::AiTells.tier(), ModelTier::Fast);
        assert_eq!(GatePass::Voice.tier(), ModelTier::Quality);
    }

    #[test]
    fn request_embeds_reference_and_draft() {
        let req = GatePass::Voice.request("my draft", "Short sentences. Dry humor.", 1024);
        assert!(req.system.starts_with(VOICE_GATE_SYSTEM));
        assert!(req.system.contains("Dry humor."));
        assert!(req.user.contains("my draft"));
        assert_eq!(req.max_tokens, 1024);

        let req = GatePass::AiTells.request("my draft", "No tapestry.", 1024);
        assert!(req.system.starts_with(AI_GATE_SYSTEM));
    }

    #[tokio::test]
    async fn output_replaces_draft_verbatim() {
        let client = Recorder::new("  rewritten\n");
        let out = rewrite_pass(&client, GatePass::AiTells, "original", Some("guide"), 4096)
            .await
            .unwrap();
        assert_eq!(out, "  rewritten\n");
        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].tier, ModelTier::Fast);
    }

    #[tokio::test]
    async fn missing_or_blank_reference_skips_call() {
        let client = Recorder::new("should not appear");
        let out = rewrite_pass(&client, GatePass::Voice, "original", None, 4096).await.unwrap();
        assert_eq!(out, "original");
        let out = rewrite_pass(&client, GatePass::Voice, "original", Some(" \n\t"), 4096)
            .await
            .unwrap();
        assert_eq!(out, "original");
        assert!(client.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn errors_propagate() {
        let err = rewrite_pass(&Failing, GatePass::Voice, "d", Some("voice"), 4096)
            .await
            .unwrap_err();
        assert!(matches!(err, SifterError::Generation(_)));
    }
}
