//! Corrector: one targeted retry that hands the verifier's findings back to the generation service.

use sifter_core::prompts::{correction_system_prompt, correction_user_prompt};
use sifter_core::{Completion, CompletionRequest, ModelTier, SifterConfig, SifterResult};

use crate::references::ReferenceDocs;
use crate::verifier::{Violation, ViolationCategory};

const FEEDBACK_HEADER: &str = "The following violations MUST be fixed:";

/// Knobs shared by the rewrite passes and the corrector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateSettings {
    /// Output token cap per generation call.
    pub max_tokens: u32,
    /// How much of each reference document the correction prompt includes.
    pub reference_excerpt_chars: usize,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            reference_excerpt_chars: 2000,
        }
    }
}

impl From<&SifterConfig> for GateSettings {
    fn from(config: &SifterConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            reference_excerpt_chars: config.reference_excerpt_chars,
        }
    }
}

/// Render violations as a feedback block, grouped by category in order of first appearance.
/// Each distinct match is listed once, with the line of its first occurrence.
pub fn format_violation_feedback(violations: &[Violation]) -> String {
    if violations.is_empty() {
        return String::new();
    }

    let mut groups: Vec<(ViolationCategory, Vec<&Violation>)> = Vec::new();
    for v in violations {
        match groups.iter_mut().find(|(cat, _)| *cat == v.category) {
            Some((_, items)) => {
                if !items.iter().any(|seen| seen.matched == v.matched) {
                    items.push(v);
                }
            }
            None => groups.push((v.category, vec![v])),
        }
    }

    let mut lines = vec![FEEDBACK_HEADER.to_string()];
    for (category, items) in groups {
        lines.push(String::new());
        lines.push(format!("{}:", category.label()));
        for v in items {
            lines.push(format!("  - '{}' (line {})", v.matched, v.line_number));
        }
    }
    lines.join("\n")
}

/// Exactly one correction call on the fast tier. The result replaces the draft as-is; the
/// caller re-verifies but never loops.
pub async fn correct(
    client: &dyn Completion,
    draft: &str,
    violations: &[Violation],
    references: &ReferenceDocs,
    settings: &GateSettings,
) -> SifterResult<String> {
    let feedback = format_violation_feedback(violations);
    let system = correction_system_prompt(
        references.ai_tells(),
        references.voice_print(),
        settings.reference_excerpt_chars,
    );
    let request = CompletionRequest::new(
        ModelTier::Fast,
        system,
        correction_user_prompt(&feedback, draft),
        settings.max_tokens,
    );
    tracing::info!(target: "sifter::gates", violations = violations.len(), "Requesting correction pass");
    client.complete(request).await
}
