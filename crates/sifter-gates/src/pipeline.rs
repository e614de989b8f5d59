//! Orchestrator: runs a draft through every gate in a fixed order.
//!
//! ```text
//! RewritingAi -> RewritingVoice -> Verifying -> (Correcting -> ReVerifying)?
//!     -> HardCleanup -> FinalCheck -> Done
//! ```
//!
//! Rewrite stages are skipped when their reference document is missing. The correction
//! stage runs only when verification finds something. The backstop always runs. Residual
//! violations after the backstop are logged, never raised; generation errors propagate.

use serde::Serialize;
use sifter_core::{Completion, SifterConfig, SifterResult};
use std::sync::Arc;

use crate::backstop::hard_cleanup;
use crate::catalog::RuleCatalog;
use crate::correction::{correct, GateSettings};
use crate::references::ReferenceDocs;
use crate::rewrite::{has_reference, rewrite_pass, GatePass};
use crate::verifier::{summarize, verify, Violation};

/// Residual violations listed in the final warning.
const RESIDUAL_LOG_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStage {
    RewritingAi,
    RewritingVoice,
    Verifying,
    Correcting,
    ReVerifying,
    HardCleanup,
    FinalCheck,
    Done,
}

impl GateStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateStage::RewritingAi => "rewriting_ai",
            GateStage::RewritingVoice => "rewriting_voice",
            GateStage::Verifying => "verifying",
            GateStage::Correcting => "correcting",
            GateStage::ReVerifying => "re_verifying",
            GateStage::HardCleanup => "hard_cleanup",
            GateStage::FinalCheck => "final_check",
            GateStage::Done => "done",
        }
    }
}

/// Everything a gate run produced. `draft` is the publishable text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateOutcome {
    pub draft: String,
    /// Stages actually entered, in order.
    pub stages: Vec<GateStage>,
    /// Verifier output after the rewrite passes.
    pub initial_violations: Vec<Violation>,
    /// Verifier output after the correction pass (`None` when no correction ran).
    pub post_correction_violations: Option<Vec<Violation>>,
    /// What the verifier still reports after the backstop.
    pub residual_violations: Vec<Violation>,
    pub generation_calls: usize,
}

impl GateOutcome {
    pub fn is_clean(&self) -> bool {
        self.residual_violations.is_empty()
    }
}

/// The gate pipeline bound to one rule catalog. Cheap to clone; safe to share across tasks.
#[derive(Debug, Clone)]
pub struct ContentGates {
    catalog: Arc<RuleCatalog>,
    settings: GateSettings,
}

impl Default for ContentGates {
    fn default() -> Self {
        Self::new(RuleCatalog::shared_house_style(), GateSettings::default())
    }
}

impl ContentGates {
    pub fn new(catalog: Arc<RuleCatalog>, settings: GateSettings) -> Self {
        Self { catalog, settings }
    }

    /// House-style catalog with settings taken from the config.
    pub fn from_config(config: &SifterConfig) -> Self {
        Self::new(RuleCatalog::shared_house_style(), GateSettings::from(config))
    }

    pub fn catalog(&self) -> &Arc<RuleCatalog> {
        &self.catalog
    }

    pub fn settings(&self) -> &GateSettings {
        &self.settings
    }

    /// Run one draft through all gates.
    pub async fn run(
        &self,
        client: &dyn Completion,
        draft: &str,
        references: &ReferenceDocs,
    ) -> SifterResult<GateOutcome> {
        let mut stages = Vec::new();
        let mut generation_calls = 0;
        let mut draft = draft.to_string();

        for (stage, pass, reference) in [
            (GateStage::RewritingAi, GatePass::AiTells, references.ai_tells()),
            (GateStage::RewritingVoice, GatePass::Voice, references.voice_print()),
        ] {
            if !has_reference(reference) {
                tracing::warn!(target: "sifter::gates", stage = stage.as_str(), "No reference document; stage skipped");
                continue;
            }
            enter(&mut stages, stage);
            draft = rewrite_pass(client, pass, &draft, reference, self.settings.max_tokens).await?;
            generation_calls += 1;
        }

        enter(&mut stages, GateStage::Verifying);
        let initial_violations = verify(&self.catalog, &draft);
        let mut post_correction_violations = None;
        if initial_violations.is_empty() {
            tracing::info!(target: "sifter::gates", "Draft passed verification");
        } else {
            tracing::info!(
                target: "sifter::gates",
                count = initial_violations.len(),
                sample = ?summarize(&initial_violations, 5),
                "Violations found after rewrite passes"
            );

            enter(&mut stages, GateStage::Correcting);
            draft = correct(client, &draft, &initial_violations, references, &self.settings).await?;
            generation_calls += 1;

            enter(&mut stages, GateStage::ReVerifying);
            let remaining = verify(&self.catalog, &draft);
            if remaining.is_empty() {
                tracing::info!(target: "sifter::gates", "Correction pass cleared all violations");
            } else {
                tracing::info!(
                    target: "sifter::gates",
                    count = remaining.len(),
                    sample = ?summarize(&remaining, 5),
                    "Violations remain after correction; backstop will handle them"
                );
            }
            post_correction_violations = Some(remaining);
        }

        enter(&mut stages, GateStage::HardCleanup);
        draft = hard_cleanup(&self.catalog, &draft);

        enter(&mut stages, GateStage::FinalCheck);
        let residual_violations = verify(&self.catalog, &draft);
        if residual_violations.is_empty() {
            tracing::info!(target: "sifter::gates", generation_calls, "All content gates passed");
        } else {
            tracing::warn!(
                target: "sifter::gates",
                count = residual_violations.len(),
                residual = ?summarize(&residual_violations, RESIDUAL_LOG_LIMIT),
                "Violations survived the backstop"
            );
        }

        enter(&mut stages, GateStage::Done);
        Ok(GateOutcome {
            draft,
            stages,
            initial_violations,
            post_correction_violations,
            residual_violations,
            generation_calls,
        })
    }
}

fn enter(stages: &mut Vec<GateStage>, stage: GateStage) {
    tracing::debug!(target: "sifter::gates", stage = stage.as_str(), "Entering stage");
    stages.push(stage);
}

/// Run a draft through the gates with the house-style catalog and default settings.
pub async fn run_content_gates(
    client: &dyn Completion,
    draft: &str,
    ai_tells: Option<&str>,
    voice_print: Option<&str>,
) -> SifterResult<String> {
    let references = ReferenceDocs::new(ai_tells.map(str::to_string), voice_print.map(str::to_string));
    let outcome = ContentGates::default().run(client, draft, &references).await?;
    Ok(outcome.draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sifter_core::{CompletionRequest, SifterError};

    struct Echo;

    #[async_trait::async_trait]
    impl Completion for Echo {
        async fn complete(&self, request: CompletionRequest) -> SifterResult<String> {
            Err(SifterError::Generation(format!("unexpected call: {}", request.user)))
        }
    }

    #[tokio::test]
    async fn no_references_clean_draft_makes_no_calls() {
        let outcome = ContentGates::default()
            .run(&Echo, "A plain draft.", &ReferenceDocs::default())
            .await
            .unwrap();
        assert_eq!(outcome.draft, "A plain draft.");
        assert_eq!(outcome.generation_calls, 0);
        assert_eq!(
            outcome.stages,
            vec![GateStage::Verifying, GateStage::HardCleanup, GateStage::FinalCheck, GateStage::Done]
        );
        assert!(outcome.post_correction_violations.is_none());
        assert!(outcome.is_clean());
    }

    #[tokio::test]
    async fn dirty_draft_without_references_still_asks_for_correction() {
        let err = ContentGates::default()
            .run(&Echo, "We utilize it.", &ReferenceDocs::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unexpected call"));
    }

    #[test]
    fn stages_serialize_snake_case() {
        let json = serde_json::to_string(&[GateStage::RewritingAi, GateStage::ReVerifying]).unwrap();
        assert_eq!(json, r#"["rewriting_ai","re_verifying"]"#);
    }
}
